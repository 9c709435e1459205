use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub status: Option<String>,
    pub uuid: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
}

async fn user_or_404(pool: &sqlx::PgPool, user_id: i32) -> Result<User, ApiError> {
    users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// GET /api/users - all users, optionally filtered by status
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<User>> {
    let pool = state.pool().await?;
    let users = users::list(&pool, params.status.as_deref()).await?;
    Ok(ApiResponse::success(users))
}

/// GET /api/users/:id
pub async fn get(State(state): State<AppState>, Path(user_id): Path<i32>) -> ApiResult<User> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(user_or_404(&pool, user_id).await?))
}

/// GET /api/users/uuid/:uuid
pub async fn get_by_uuid(
    State(state): State<AppState>,
    Path(user_uuid): Path<String>,
) -> ApiResult<User> {
    let pool = state.pool().await?;
    let user = users::find_by_uuid(&pool, &user_uuid)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

/// POST /api/users - console-created user (no credentials until signup)
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> ApiResult<User> {
    for (field, value) in [
        ("email", &payload.email),
        ("username", &payload.username),
        ("status", &payload.status),
        ("full_name", &payload.full_name),
    ] {
        if value.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::missing_field(field));
        }
    }

    let username = payload.username.as_deref().unwrap_or_default();
    let uuid = payload
        .uuid
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| format!("user-{}", Uuid::new_v4()));
    let profile_image = payload.profile_image.clone().unwrap_or_else(|| {
        format!(
            "https://ui-avatars.com/api/?name={}&background=random",
            username
        )
    });

    let pool = state.pool().await?;

    let user = users::create(
        &pool,
        users::NewUser {
            uuid: &uuid,
            email: payload.email.as_deref().unwrap_or_default(),
            username,
            full_name: payload.full_name.as_deref().unwrap_or_default(),
            profile_image: &profile_image,
            bio: payload.bio.as_deref().unwrap_or_default(),
            role: "user",
            password_hash: None,
            status: payload.status.as_deref().unwrap_or_default(),
        },
    )
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::bad_request("User with this email, username or uuid already exists")
        }
        _ => ApiError::from(e),
    })?;

    Ok(ApiResponse::created(user))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> ApiResult<User> {
    let pool = state.pool().await?;
    user_or_404(&pool, user_id).await?;

    let user = users::update(
        &pool,
        user_id,
        users::UserChanges {
            email: payload.email,
            username: payload.username,
            full_name: payload.full_name,
            profile_image: payload.profile_image,
            bio: payload.bio,
            status: payload.status,
            role: payload.role,
        },
    )
    .await?;

    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    let user = user_or_404(&pool, user_id).await?;

    users::delete(&pool, user_id).await?;

    Ok(ApiResponse::success(json!({
        "message": "User deleted successfully",
        "user": user,
    })))
}

/// GET /api/users/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<users::UserStats> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(users::stats(&pool).await?))
}
