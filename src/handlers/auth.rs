use axum::{extract::State, http::HeaderMap, Extension};
use serde::Deserialize;
use serde_json::json;

use crate::auth::password;
use crate::auth::token::{Realm, TokenKind};
use crate::database::admins;
use crate::database::models::AdminView;
use crate::error::ApiError;
use crate::middleware::auth::{extract_bearer_token, CurrentAdmin};
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// POST /api/auth/login - authenticate an admin and issue tokens.
///
/// The username field also accepts the account email. Unknown accounts and
/// wrong passwords produce the same generic 401 so callers cannot probe
/// which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<serde_json::Value> {
    let (username, password) = match (&payload.username, &payload.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(ApiError::bad_request("Missing username or password")),
    };

    let pool = state.pool().await?;

    let admin = admins::find_by_identity(&pool, username)
        .await?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    if !admin.is_active {
        return Err(ApiError::forbidden("Your account has been deactivated"));
    }

    if !password::verify_password(password, &admin.password_hash)? {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    admins::touch_last_login(&pool, admin.id).await?;

    let token = state.tokens.issue(admin.id, Realm::Admin, TokenKind::Access)?;
    let refresh_token = state.tokens.issue(admin.id, Realm::Admin, TokenKind::Refresh)?;

    let view = admins::view(&pool, admin).await?;
    tracing::info!("Admin {} logged in", view.account.username);

    Ok(ApiResponse::success(json!({
        "token": token,
        "refresh_token": refresh_token,
        "expires_in": state.tokens.access_ttl_secs(),
        "admin": view,
    })))
}

/// POST /api/auth/refresh - mint a new access token from a refresh token.
///
/// The refresh token is presented as the bearer credential; an access token
/// presented here is rejected as the wrong kind.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let token = extract_bearer_token(&headers)?;
    let claims = state
        .tokens
        .verify_expecting(&token, Realm::Admin, TokenKind::Refresh)?;

    let pool = state.pool().await?;
    let admin = admins::find_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid admin account"))?;

    if !admin.is_active {
        return Err(ApiError::forbidden("Your account has been deactivated"));
    }

    let token = state.tokens.issue(admin.id, Realm::Admin, TokenKind::Access)?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "expires_in": state.tokens.access_ttl_secs(),
    })))
}

/// GET /api/auth/me - current authenticated admin
pub async fn me(Extension(current): Extension<CurrentAdmin>) -> ApiResult<AdminView> {
    Ok(ApiResponse::success(AdminView {
        account: current.account,
        roles: current.roles,
    }))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let (current_password, new_password) = match (&payload.current_password, &payload.new_password)
    {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => {
            return Err(ApiError::bad_request(
                "Missing current password or new password",
            ))
        }
    };

    if !password::verify_password(current_password, &current.account.password_hash)? {
        return Err(ApiError::bad_request("Current password is incorrect"));
    }

    let pool = state.pool().await?;
    let password_hash = password::hash_password(new_password)?;
    admins::update_password(&pool, current.account.id, &password_hash).await?;

    Ok(ApiResponse::success(json!({
        "message": "Password changed successfully"
    })))
}
