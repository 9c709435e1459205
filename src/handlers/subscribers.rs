use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::database::models::Subscriber;
use crate::database::subscribers;
use crate::error::ApiError;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{PageParams, Pagination};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub subscription_type: Option<String>,
    pub status: Option<String>,
    #[serde(default = "super::default_page")]
    pub page: i64,
    #[serde(default = "super::default_per_page")]
    pub per_page: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriberRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub subscription_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubscriberRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub subscription_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

fn parse_date(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|_| {
            ApiError::validation(
                format!("Invalid date format for {}", field),
                json!({ "field": field }),
            )
        })
}

async fn subscriber_or_404(
    pool: &sqlx::PgPool,
    subscriber_id: i32,
) -> Result<Subscriber, ApiError> {
    subscribers::find_by_id(pool, subscriber_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subscriber not found"))
}

/// GET /api/subscribers - filtered, paginated listing
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let page_params = PageParams {
        page: params.page,
        per_page: params.per_page,
    };

    let total = subscribers::count(
        &pool,
        params.subscription_type.as_deref(),
        params.status.as_deref(),
    )
    .await?;
    let items = subscribers::list(
        &pool,
        params.subscription_type.as_deref(),
        params.status.as_deref(),
        page_params.limit(),
        page_params.offset(),
    )
    .await?;

    Ok(ApiResponse::success(json!({
        "items": items,
        "pagination": Pagination::new(total, page_params),
    })))
}

/// GET /api/subscribers/:id
pub async fn get(
    State(state): State<AppState>,
    Path(subscriber_id): Path<i32>,
) -> ApiResult<Subscriber> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(
        subscriber_or_404(&pool, subscriber_id).await?,
    ))
}

/// POST /api/subscribers
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubscriberRequest>,
) -> ApiResult<Subscriber> {
    for (field, value) in [
        ("email", &payload.email),
        ("name", &payload.name),
        ("subscription_type", &payload.subscription_type),
        ("start_date", &payload.start_date),
        ("end_date", &payload.end_date),
        ("status", &payload.status),
    ] {
        if value.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::missing_field(field));
        }
    }

    let start_date = parse_date("start_date", payload.start_date.as_deref().unwrap_or_default())?;
    let end_date = parse_date("end_date", payload.end_date.as_deref().unwrap_or_default())?;

    let pool = state.pool().await?;

    let subscriber = subscribers::create(
        &pool,
        subscribers::NewSubscriber {
            email: payload.email.as_deref().unwrap_or_default(),
            name: payload.name.as_deref().unwrap_or_default(),
            subscription_type: payload.subscription_type.as_deref().unwrap_or_default(),
            start_date,
            end_date,
            status: payload.status.as_deref().unwrap_or_default(),
        },
    )
    .await?;

    Ok(ApiResponse::created(subscriber))
}

/// PUT /api/subscribers/:id
pub async fn update(
    State(state): State<AppState>,
    Path(subscriber_id): Path<i32>,
    AppJson(payload): AppJson<UpdateSubscriberRequest>,
) -> ApiResult<Subscriber> {
    let pool = state.pool().await?;
    subscriber_or_404(&pool, subscriber_id).await?;

    let start_date = match &payload.start_date {
        Some(value) => Some(parse_date("start_date", value)?),
        None => None,
    };
    let end_date = match &payload.end_date {
        Some(value) => Some(parse_date("end_date", value)?),
        None => None,
    };

    let subscriber = subscribers::update(
        &pool,
        subscriber_id,
        subscribers::SubscriberChanges {
            email: payload.email,
            name: payload.name,
            subscription_type: payload.subscription_type,
            start_date,
            end_date,
            status: payload.status,
        },
    )
    .await?;

    Ok(ApiResponse::success(subscriber))
}

/// DELETE /api/subscribers/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(subscriber_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    subscriber_or_404(&pool, subscriber_id).await?;

    subscribers::delete(&pool, subscriber_id).await?;

    Ok(ApiResponse::success(json!({
        "message": "Subscriber deleted successfully",
        "id": subscriber_id,
    })))
}

/// GET /api/subscribers/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<subscribers::SubscriberStats> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(subscribers::stats(&pool).await?))
}
