use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::password;
use crate::database::admins;
use crate::database::models::AdminView;
use crate::error::ApiError;
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{PageParams, Pagination};

#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub role_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub role_ids: Option<Vec<i32>>,
}

async fn find_or_404(
    pool: &sqlx::PgPool,
    admin_id: i32,
) -> Result<crate::database::models::AdminAccount, ApiError> {
    admins::find_by_id(pool, admin_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Admin with ID {} not found", admin_id)))
}

/// GET /api/admins - paginated admin listing with roles
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let total = admins::count(&pool).await?;
    let accounts = admins::list(&pool, params.limit(), params.offset()).await?;

    let mut views = Vec::with_capacity(accounts.len());
    for account in accounts {
        views.push(admins::view(&pool, account).await?);
    }

    Ok(ApiResponse::success(json!({
        "admins": views,
        "pagination": Pagination::new(total, params),
    })))
}

/// GET /api/admins/:id
pub async fn get(
    State(state): State<AppState>,
    Path(admin_id): Path<i32>,
) -> ApiResult<AdminView> {
    let pool = state.pool().await?;
    let account = find_or_404(&pool, admin_id).await?;
    Ok(ApiResponse::success(admins::view(&pool, account).await?))
}

/// POST /api/admins
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAdminRequest>,
) -> ApiResult<AdminView> {
    let (username, email, name, plain_password) = match (
        &payload.username,
        &payload.email,
        &payload.name,
        &payload.password,
    ) {
        (Some(u), Some(e), Some(n), Some(p))
            if !u.is_empty() && !e.is_empty() && !n.is_empty() && !p.is_empty() =>
        {
            (u, e, n, p)
        }
        _ => {
            return Err(ApiError::bad_request(
                "Username, email, name, and password are required",
            ))
        }
    };

    let pool = state.pool().await?;

    if admins::username_exists(&pool, username, None).await? {
        return Err(ApiError::bad_request(format!(
            "Admin with username '{}' already exists",
            username
        )));
    }
    if admins::email_exists(&pool, email, None).await? {
        return Err(ApiError::bad_request(format!(
            "Admin with email '{}' already exists",
            email
        )));
    }

    let password_hash = password::hash_password(plain_password)?;
    let account = admins::create(
        &pool,
        admins::NewAdmin {
            username,
            email,
            name,
            password_hash: &password_hash,
            is_active: payload.is_active.unwrap_or(true),
        },
    )
    .await?;

    if let Some(role_ids) = &payload.role_ids {
        admins::set_roles(&pool, account.id, role_ids).await?;
    }

    tracing::info!("Created admin account {}", account.username);
    Ok(ApiResponse::success(admins::view(&pool, account).await?))
}

/// PUT /api/admins/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Path(admin_id): Path<i32>,
    AppJson(payload): AppJson<UpdateAdminRequest>,
) -> ApiResult<AdminView> {
    let pool = state.pool().await?;
    find_or_404(&pool, admin_id).await?;

    // Deactivating yourself would lock you out mid-session
    if current.account.id == admin_id && payload.is_active == Some(false) {
        return Err(ApiError::forbidden("You cannot deactivate your own account"));
    }

    if let Some(username) = &payload.username {
        if admins::username_exists(&pool, username, Some(admin_id)).await? {
            return Err(ApiError::bad_request(format!(
                "Admin with username '{}' already exists",
                username
            )));
        }
    }
    if let Some(email) = &payload.email {
        if admins::email_exists(&pool, email, Some(admin_id)).await? {
            return Err(ApiError::bad_request(format!(
                "Admin with email '{}' already exists",
                email
            )));
        }
    }

    let password_hash = match &payload.password {
        Some(plain) if !plain.is_empty() => Some(password::hash_password(plain)?),
        _ => None,
    };

    let account = admins::update(
        &pool,
        admin_id,
        admins::AdminChanges {
            username: payload.username,
            email: payload.email,
            name: payload.name,
            password_hash,
            is_active: payload.is_active,
        },
    )
    .await?;

    if let Some(role_ids) = &payload.role_ids {
        admins::set_roles(&pool, admin_id, role_ids).await?;
    }

    Ok(ApiResponse::success(admins::view(&pool, account).await?))
}

/// DELETE /api/admins/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Path(admin_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    if current.account.id == admin_id {
        return Err(ApiError::forbidden("You cannot delete your own account"));
    }

    let pool = state.pool().await?;
    let account = find_or_404(&pool, admin_id).await?;

    admins::delete(&pool, admin_id).await?;
    tracing::info!("Deleted admin account {}", account.username);

    Ok(ApiResponse::success(json!({
        "message": format!("Admin '{}' deleted successfully", account.name)
    })))
}

/// PATCH /api/admins/:id/toggle-status
pub async fn toggle_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Path(admin_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    if current.account.id == admin_id {
        return Err(ApiError::forbidden(
            "You cannot change the status of your own account",
        ));
    }

    let pool = state.pool().await?;
    let account = admins::toggle_status(&pool, admin_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Admin with ID {} not found", admin_id)))?;

    let status = if account.is_active { "activated" } else { "deactivated" };
    let message = format!("Admin '{}' {} successfully", account.name, status);
    let view = admins::view(&pool, account).await?;

    Ok(ApiResponse::success(json!({
        "message": message,
        "admin": view,
    })))
}
