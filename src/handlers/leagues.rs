use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::database::leagues;
use crate::database::models::League;
use crate::error::ApiError;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeagueRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub popularity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeagueRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub popularity: Option<i32>,
    pub headquarters: Option<String>,
    pub commissioner: Option<String>,
    pub divisions: Option<Vec<String>>,
    pub num_teams: Option<i32>,
    pub enabled: Option<bool>,
}

async fn league_or_404(pool: &sqlx::PgPool, league_id: i32) -> Result<League, ApiError> {
    leagues::find_by_id(pool, league_id)
        .await?
        .ok_or_else(|| ApiError::not_found("League not found"))
}

/// GET /api/leagues - optionally filtered by category and country
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<League>> {
    let pool = state.pool().await?;
    let leagues =
        leagues::list(&pool, params.category.as_deref(), params.country.as_deref()).await?;
    Ok(ApiResponse::success(leagues))
}

/// GET /api/leagues/:id
pub async fn get(State(state): State<AppState>, Path(league_id): Path<i32>) -> ApiResult<League> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(league_or_404(&pool, league_id).await?))
}

/// POST /api/leagues
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateLeagueRequest>,
) -> ApiResult<League> {
    for (field, value) in [
        ("name", &payload.name),
        ("category", &payload.category),
        ("country", &payload.country),
        ("logo_url", &payload.logo_url),
    ] {
        if value.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::missing_field(field));
        }
    }

    let pool = state.pool().await?;

    let league = leagues::create(
        &pool,
        leagues::NewLeague {
            name: payload.name.as_deref().unwrap_or_default(),
            category: payload.category.as_deref().unwrap_or_default(),
            country: payload.country.as_deref().unwrap_or_default(),
            logo_url: payload.logo_url.as_deref().unwrap_or_default(),
            popularity: payload.popularity.unwrap_or(0),
        },
    )
    .await?;

    Ok(ApiResponse::created(league))
}

/// PUT /api/leagues/:id
pub async fn update(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
    AppJson(payload): AppJson<UpdateLeagueRequest>,
) -> ApiResult<League> {
    let pool = state.pool().await?;
    league_or_404(&pool, league_id).await?;

    let league = leagues::update(
        &pool,
        league_id,
        leagues::LeagueChanges {
            name: payload.name,
            category: payload.category,
            country: payload.country,
            logo_url: payload.logo_url,
            popularity: payload.popularity,
            headquarters: payload.headquarters,
            commissioner: payload.commissioner,
            divisions: payload.divisions,
            num_teams: payload.num_teams,
            enabled: payload.enabled,
        },
    )
    .await?;

    Ok(ApiResponse::success(league))
}

/// PUT /api/leagues/:id/toggle - flip the enabled flag
pub async fn toggle(State(state): State<AppState>, Path(league_id): Path<i32>) -> ApiResult<League> {
    let pool = state.pool().await?;
    let league = leagues::toggle_enabled(&pool, league_id)
        .await?
        .ok_or_else(|| ApiError::not_found("League not found"))?;
    Ok(ApiResponse::success(league))
}

/// DELETE /api/leagues/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    league_or_404(&pool, league_id).await?;

    leagues::delete(&pool, league_id).await?;

    Ok(ApiResponse::success(json!({
        "message": "League deleted successfully",
        "id": league_id,
    })))
}

/// GET /api/leagues/popular
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> ApiResult<Vec<League>> {
    let pool = state.pool().await?;
    let leagues = leagues::popular(&pool, params.limit.unwrap_or(5)).await?;
    Ok(ApiResponse::success(leagues))
}
