use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::database::models::Reel;
use crate::database::{leagues, players, reels, teams};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub player_id: Option<i32>,
    pub limit: Option<i64>,
}

/// GET /api/reels - optionally filtered by player, capped at `limit`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Reel>> {
    let pool = state.pool().await?;
    let reels = reels::list(&pool, params.player_id, params.limit.unwrap_or(20)).await?;
    Ok(ApiResponse::success(reels))
}

/// GET /api/reels/:id - the reel enriched with player, team and league
pub async fn get(
    State(state): State<AppState>,
    Path(reel_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let reel = reels::find_by_id(&pool, reel_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Reel with ID {} not found", reel_id)))?;

    let player = players::find_by_id(&pool, reel.player_id).await?;
    let team = match &player {
        Some(player) => teams::find_by_id(&pool, player.team_id).await?,
        None => None,
    };
    let league = match &player {
        Some(player) => leagues::find_by_id(&pool, player.league_id).await?,
        None => None,
    };

    let mut body = serde_json::to_value(&reel)
        .map_err(|_| ApiError::internal_server_error("Failed to format response"))?;
    body["player"] = json!(player);
    body["team"] = json!(team);
    body["league"] = json!(league);

    Ok(ApiResponse::success(body))
}

/// GET /api/reels/popular - top reels by view count
pub async fn popular(State(state): State<AppState>) -> ApiResult<Vec<Reel>> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(reels::popular(&pool, 5).await?))
}

/// GET /api/reels/manage - player/team/league digest for the console
pub async fn manage(State(state): State<AppState>) -> ApiResult<Vec<reels::ReelManageRow>> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(reels::manage_digest(&pool).await?))
}
