use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::database::models::Notification;
use crate::database::notifications;
use crate::error::ApiError;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub target_type: Option<String>,
    pub target_user_id: Option<String>,
    pub sent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub destination_url: Option<String>,
    pub image_url: Option<String>,
    pub icon_url: Option<String>,
    pub target_type: Option<String>,
    pub target_user_id: Option<i32>,
    pub sent: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub destination_url: Option<String>,
    pub image_url: Option<String>,
    pub icon_url: Option<String>,
    pub target_type: Option<String>,
    pub target_user_id: Option<i32>,
    pub sent: Option<bool>,
}

async fn notification_or_404(
    pool: &sqlx::PgPool,
    notification_id: i32,
) -> Result<Notification, ApiError> {
    notifications::find_by_id(pool, notification_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Notification with ID {} not found",
                notification_id
            ))
        })
}

/// GET /api/notifications - filtered by target and sent status
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Notification>> {
    let target_user_id = match &params.target_user_id {
        Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
            ApiError::bad_request("Invalid user_id format. Must be an integer.")
        })?),
        None => None,
    };
    let sent = params.sent.as_deref().map(|s| s.eq_ignore_ascii_case("true"));

    let pool = state.pool().await?;
    let notifications = notifications::list(
        &pool,
        params.target_type.as_deref(),
        target_user_id,
        sent,
    )
    .await?;

    Ok(ApiResponse::success(notifications))
}

/// GET /api/notifications/:id
pub async fn get(
    State(state): State<AppState>,
    Path(notification_id): Path<i32>,
) -> ApiResult<Notification> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(
        notification_or_404(&pool, notification_id).await?,
    ))
}

/// POST /api/notifications
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNotificationRequest>,
) -> ApiResult<Notification> {
    for (field, value) in [
        ("title", &payload.title),
        ("message", &payload.message),
        ("destination_url", &payload.destination_url),
    ] {
        if value.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::missing_field(field));
        }
    }

    let target_type = payload.target_type.as_deref().unwrap_or("all");
    if target_type == "user" && payload.target_user_id.is_none() {
        return Err(ApiError::bad_request(
            "target_user_id is required when target_type is 'user'",
        ));
    }

    let pool = state.pool().await?;

    let notification = notifications::create(
        &pool,
        notifications::NewNotification {
            title: payload.title.as_deref().unwrap_or_default(),
            message: payload.message.as_deref().unwrap_or_default(),
            destination_url: payload.destination_url.as_deref().unwrap_or_default(),
            image_url: payload.image_url.as_deref().unwrap_or_default(),
            icon_url: payload.icon_url.as_deref().unwrap_or_default(),
            target_type,
            target_user_id: payload.target_user_id,
            sent: payload.sent.unwrap_or(false),
        },
    )
    .await?;

    Ok(ApiResponse::created(notification))
}

/// PUT /api/notifications/:id
pub async fn update(
    State(state): State<AppState>,
    Path(notification_id): Path<i32>,
    AppJson(payload): AppJson<UpdateNotificationRequest>,
) -> ApiResult<Notification> {
    let pool = state.pool().await?;
    notification_or_404(&pool, notification_id).await?;

    // Retargeting rules: switching to "user" needs an explicit target,
    // switching to "all" clears it
    let target_user_id = match payload.target_type.as_deref() {
        Some("user") => match payload.target_user_id {
            Some(id) => Some(Some(id)),
            None => {
                return Err(ApiError::bad_request(
                    "target_user_id is required when target_type is 'user'",
                ))
            }
        },
        Some("all") => Some(None),
        _ => None,
    };

    let notification = notifications::update(
        &pool,
        notification_id,
        notifications::NotificationChanges {
            title: payload.title,
            message: payload.message,
            destination_url: payload.destination_url,
            image_url: payload.image_url,
            icon_url: payload.icon_url,
            target_type: payload.target_type,
            target_user_id,
            sent: payload.sent,
        },
    )
    .await?;

    Ok(ApiResponse::success(notification))
}

/// DELETE /api/notifications/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(notification_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    let notification = notification_or_404(&pool, notification_id).await?;

    notifications::delete(&pool, notification_id).await?;

    Ok(ApiResponse::success(json!({
        "message": format!("Notification with ID {} deleted successfully", notification_id),
        "deleted": notification,
    })))
}

/// POST /api/notifications/:id/send - mark as sent; delivery itself is an
/// external integration
pub async fn send(
    State(state): State<AppState>,
    Path(notification_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    let notification = notification_or_404(&pool, notification_id).await?;

    if notification.sent {
        return Err(ApiError::bad_request(format!(
            "Notification with ID {} has already been sent",
            notification_id
        )));
    }

    let notification = notifications::mark_sent(&pool, notification_id).await?;
    tracing::info!("Notification {} marked as sent", notification_id);

    Ok(ApiResponse::success(json!({
        "message": format!("Notification with ID {} sent successfully", notification_id),
        "notification": notification,
    })))
}
