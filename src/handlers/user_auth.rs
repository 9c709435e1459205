use axum::{extract::State, http::HeaderMap, Extension};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::password;
use crate::auth::token::{Realm, TokenKind};
use crate::database::models::User;
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::auth::{extract_bearer_token, CurrentUser};
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFavoritesRequest {
    #[serde(default)]
    pub favorite_sports: Vec<String>,
    #[serde(default)]
    pub favorite_teams: Vec<i32>,
    #[serde(default)]
    pub favorite_players: Vec<i32>,
}

fn default_avatar(username: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        username
    )
}

/// POST /api/user-auth/signup - register a new end-user account
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> ApiResult<serde_json::Value> {
    for (field, value) in [
        ("email", &payload.email),
        ("username", &payload.username),
        ("password", &payload.password),
        ("full_name", &payload.full_name),
    ] {
        if value.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::missing_field(field));
        }
    }

    let email = payload.email.as_deref().unwrap_or_default();
    let username = payload.username.as_deref().unwrap_or_default();

    let pool = state.pool().await?;

    if users::email_exists(&pool, email).await? {
        return Err(ApiError::conflict("Email already registered"));
    }
    if users::username_exists(&pool, username).await? {
        return Err(ApiError::conflict("Username already taken"));
    }

    let password_hash = password::hash_password(payload.password.as_deref().unwrap_or_default())?;
    let uuid = Uuid::new_v4().to_string();
    let profile_image = payload
        .profile_image
        .clone()
        .unwrap_or_else(|| default_avatar(username));

    let user = users::create(
        &pool,
        users::NewUser {
            uuid: &uuid,
            email,
            username,
            full_name: payload.full_name.as_deref().unwrap_or_default(),
            profile_image: &profile_image,
            bio: payload.bio.as_deref().unwrap_or_default(),
            role: "user",
            password_hash: Some(&password_hash),
            status: "active",
        },
    )
    .await
    .map_err(|e| match &e {
        // A concurrent signup can still slip past the existence checks
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict("User with this email or username already exists")
        }
        _ => ApiError::from(e),
    })?;

    let access_token = state.tokens.issue(user.id, Realm::User, TokenKind::Access)?;
    let refresh_token = state.tokens.issue(user.id, Realm::User, TokenKind::Refresh)?;

    tracing::info!("New user registered: {}", user.username);

    Ok(ApiResponse::success(json!({
        "message": "User registered successfully",
        "user": user,
        "access_token": access_token,
        "refresh_token": refresh_token,
    })))
}

/// POST /api/user-auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<serde_json::Value> {
    let (username, password) = match (&payload.username, &payload.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Err(ApiError::bad_request(
                "Missing username/email or password",
            ))
        }
    };

    let pool = state.pool().await?;

    let user = users::find_by_identity(&pool, username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username/email or password"))?;

    let Some(stored_hash) = user.password_hash.as_deref() else {
        return Err(ApiError::unauthorized("Invalid username/email or password"));
    };
    if !password::verify_password(password, stored_hash)? {
        return Err(ApiError::unauthorized("Invalid username/email or password"));
    }

    if user.status != "active" {
        return Err(ApiError::forbidden(
            "Your account has been deactivated or suspended",
        ));
    }

    users::touch_last_login(&pool, user.id).await?;

    let access_token = state.tokens.issue(user.id, Realm::User, TokenKind::Access)?;
    let refresh_token = state.tokens.issue(user.id, Realm::User, TokenKind::Refresh)?;

    Ok(ApiResponse::success(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "user": user,
    })))
}

/// POST /api/user-auth/refresh - new access token from a user refresh token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let token = extract_bearer_token(&headers)?;
    let claims = state
        .tokens
        .verify_expecting(&token, Realm::User, TokenKind::Refresh)?;

    let pool = state.pool().await?;
    let user = users::find_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid authentication credentials"))?;

    if user.status != "active" {
        return Err(ApiError::forbidden(
            "Your account has been deactivated or suspended",
        ));
    }

    let access_token = state.tokens.issue(user.id, Realm::User, TokenKind::Access)?;

    Ok(ApiResponse::success(json!({
        "access_token": access_token,
    })))
}

/// GET /api/user-auth/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(current.user))
}

/// PUT /api/user-auth/me - update the caller's own profile
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let user = users::update(
        &pool,
        current.user.id,
        users::UserChanges {
            full_name: payload.full_name,
            bio: payload.bio,
            profile_image: payload.profile_image,
            ..Default::default()
        },
    )
    .await?;

    Ok(ApiResponse::success(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}

/// POST /api/user-auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
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

    let Some(stored_hash) = current.user.password_hash.as_deref() else {
        return Err(ApiError::bad_request("Current password is incorrect"));
    };
    if !password::verify_password(current_password, stored_hash)? {
        return Err(ApiError::bad_request("Current password is incorrect"));
    }

    let pool = state.pool().await?;
    let password_hash = password::hash_password(new_password)?;
    users::update_password(&pool, current.user.id, &password_hash).await?;

    Ok(ApiResponse::success(json!({
        "message": "Password changed successfully"
    })))
}

/// PUT /api/user-auth/update-favorites - replace the caller's favorite sets.
/// The payload replaces all three lists wholesale, so repeating the same
/// request leaves the stored sets unchanged.
pub async fn update_favorites(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<UpdateFavoritesRequest>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let user = users::update_favorites(
        &pool,
        current.user.id,
        &payload.favorite_sports,
        &payload.favorite_teams,
        &payload.favorite_players,
    )
    .await?;

    Ok(ApiResponse::success(json!({
        "message": "Favorites updated successfully",
        "user": user,
    })))
}
