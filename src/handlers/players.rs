use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::database::models::Player;
use crate::database::{players, reels};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub league_id: Option<i32>,
    pub team_id: Option<i32>,
    pub status: Option<String>,
}

/// GET /api/players - filtered by league, team or status
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Player>> {
    let pool = state.pool().await?;
    let players = players::list(
        &pool,
        params.league_id,
        params.team_id,
        params.status.as_deref(),
    )
    .await?;
    Ok(ApiResponse::success(players))
}

/// GET /api/players/:id - the player with their reels inlined
pub async fn get(
    State(state): State<AppState>,
    Path(player_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let player = players::find_by_id(&pool, player_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Player with ID {} not found", player_id)))?;
    let reels = reels::for_player(&pool, player_id).await?;

    let mut body = serde_json::to_value(&player)
        .map_err(|_| ApiError::internal_server_error("Failed to format response"))?;
    body["reels"] = json!(reels);

    Ok(ApiResponse::success(body))
}

/// GET /api/players/popular
pub async fn popular(State(state): State<AppState>) -> ApiResult<Vec<Player>> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(players::popular(&pool, 5).await?))
}
