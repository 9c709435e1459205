use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::permission::PermissionSet;
use crate::auth::token::{Realm, TokenError, TokenKind};
use crate::database::models::{AdminAccount, Role, User};
use crate::database::{admins, users};
use crate::error::ApiError;
use crate::middleware::permissions::required_permission;
use crate::state::AppState;

/// Authenticated admin context injected into protected requests
#[derive(Clone, Debug)]
pub struct CurrentAdmin {
    pub account: AdminAccount,
    pub roles: Vec<Role>,
    pub permissions: PermissionSet,
}

/// Authenticated end user injected into user-realm requests
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
}

/// Gate for the protected admin API. Request state machine:
/// token presented → token valid → account valid → permission granted →
/// handler; any failure short-circuits into a rejected response.
pub async fn admin_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let required = required_permission(request.uri().path());

    let token = extract_bearer_token(request.headers())?;
    let claims = state
        .tokens
        .verify_expecting(&token, Realm::Admin, TokenKind::Access)?;

    let pool = state.pool().await?;
    let (account, roles) = admins::find_with_roles(&pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid admin account"))?;

    if !account.is_active {
        tracing::warn!("Rejected request from deactivated admin {}", account.id);
        return Err(ApiError::forbidden("Account is deactivated"));
    }

    let permissions = PermissionSet::from_roles(&roles);
    if let Some(tag) = required {
        if !permissions.allows(tag) {
            return Err(ApiError::forbidden(format!(
                "You don't have the required permission: {}",
                tag
            )));
        }
    }

    request.extensions_mut().insert(CurrentAdmin {
        account,
        roles,
        permissions,
    });

    Ok(next.run(request).await)
}

/// Gate for end-user routes. Requires a user-realm access token and an
/// active user account.
pub async fn user_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;
    let claims = state
        .tokens
        .verify_expecting(&token, Realm::User, TokenKind::Access)?;

    let pool = state.pool().await?;
    let user = users::find_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid authentication credentials"))?;

    if user.status != "active" {
        return Err(ApiError::forbidden(
            "Your account has been deactivated or suspended",
        ));
    }

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(TokenError::Missing)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err(ApiError::unauthorized("Empty bearer token")),
        None => Err(ApiError::unauthorized(
            "Authorization header must use Bearer token format",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        let err = extract_bearer_token(&headers).unwrap_err();
        assert_eq!(err.message(), "Authentication token is missing");
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let headers = headers_with("Basic dXNlcjpwdw==");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn test_empty_bearer_rejected() {
        let headers = headers_with("Bearer   ");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
