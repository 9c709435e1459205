use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::database::models::Team;
use crate::database::{leagues, teams};
use crate::error::ApiError;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub league_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: Option<String>,
    pub league_id: Option<i32>,
    pub logo_url: Option<String>,
    pub popularity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub league_id: Option<i32>,
    pub logo_url: Option<String>,
    pub popularity: Option<i32>,
}

async fn team_or_404(pool: &sqlx::PgPool, team_id: i32) -> Result<Team, ApiError> {
    teams::find_by_id(pool, team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team not found"))
}

/// A team must always point at an existing league
async fn require_league(pool: &sqlx::PgPool, league_id: i32) -> Result<(), ApiError> {
    if leagues::find_by_id(pool, league_id).await?.is_none() {
        return Err(ApiError::bad_request(format!(
            "League with ID {} does not exist",
            league_id
        )));
    }
    Ok(())
}

/// GET /api/teams - optionally filtered by league
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Team>> {
    let pool = state.pool().await?;
    let teams = teams::list(&pool, params.league_id).await?;
    Ok(ApiResponse::success(teams))
}

/// GET /api/teams/:id
pub async fn get(State(state): State<AppState>, Path(team_id): Path<i32>) -> ApiResult<Team> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(team_or_404(&pool, team_id).await?))
}

/// POST /api/teams
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeamRequest>,
) -> ApiResult<Team> {
    let name = match &payload.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ApiError::missing_field("name")),
    };
    let Some(league_id) = payload.league_id else {
        return Err(ApiError::missing_field("league_id"));
    };
    let logo_url = match &payload.logo_url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ApiError::missing_field("logo_url")),
    };

    let pool = state.pool().await?;
    require_league(&pool, league_id).await?;

    let team = teams::create(
        &pool,
        teams::NewTeam {
            name,
            league_id,
            logo_url,
            popularity: payload.popularity.unwrap_or(0),
        },
    )
    .await?;

    Ok(ApiResponse::created(team))
}

/// PUT /api/teams/:id
pub async fn update(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    AppJson(payload): AppJson<UpdateTeamRequest>,
) -> ApiResult<Team> {
    let pool = state.pool().await?;
    team_or_404(&pool, team_id).await?;

    if let Some(league_id) = payload.league_id {
        require_league(&pool, league_id).await?;
    }

    let team = teams::update(
        &pool,
        team_id,
        teams::TeamChanges {
            name: payload.name,
            league_id: payload.league_id,
            logo_url: payload.logo_url,
            popularity: payload.popularity,
        },
    )
    .await?;

    Ok(ApiResponse::success(team))
}

/// DELETE /api/teams/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    team_or_404(&pool, team_id).await?;

    teams::delete(&pool, team_id).await?;

    Ok(ApiResponse::success(json!({
        "message": "Team deleted successfully",
        "id": team_id,
    })))
}

/// GET /api/teams/popular
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> ApiResult<Vec<Team>> {
    let pool = state.pool().await?;
    let teams = teams::popular(&pool, params.limit.unwrap_or(5)).await?;
    Ok(ApiResponse::success(teams))
}
