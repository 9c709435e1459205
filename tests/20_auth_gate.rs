mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use gambit_admin_api::auth::token::{Realm, TokenCodec, TokenKind};
use gambit_admin_api::config::SecurityConfig;

fn security_config(access_ttl_secs: i64) -> SecurityConfig {
    SecurityConfig {
        jwt_secret: common::TEST_JWT_SECRET.to_string(),
        access_token_ttl_secs: access_ttl_secs,
        refresh_token_ttl_secs: 30 * 24 * 3600,
        cors_origins: vec![],
    }
}

/// Codec sharing the spawned server's secret
fn codec() -> TokenCodec {
    TokenCodec::new(&security_config(3600))
}

async fn get_with_bearer(path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let mut request = client.get(format!("{}{}", server.base_url, path));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let res = request.send().await?;
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}

fn assert_rejected(status: StatusCode, body: &Value, expected: StatusCode) {
    assert_eq!(status, expected, "body: {}", body);
    assert_eq!(body["success"], serde_json::json!(false));
    assert!(body["error"]["message"].is_string(), "body: {}", body);
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let (status, body) = get_with_bearer("/api/players", None).await?;
    assert_rejected(status, &body, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"]["message"],
        serde_json::json!("Authentication token is missing")
    );
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let (status, body) = get_with_bearer("/api/players", Some("not-a-real-token")).await?;
    assert_rejected(status, &body, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthorized() -> Result<()> {
    let foreign = TokenCodec::new(&SecurityConfig {
        jwt_secret: "a-different-secret-entirely".to_string(),
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 30 * 24 * 3600,
        cors_origins: vec![],
    });
    let token = foreign.issue(1, Realm::Admin, TokenKind::Access)?;

    let (status, body) = get_with_bearer("/api/players", Some(&token)).await?;
    assert_rejected(status, &body, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    // Issued with a negative lifetime, so already past its expiry instant
    let expired_codec = TokenCodec::new(&security_config(-10));
    let token = expired_codec.issue(1, Realm::Admin, TokenKind::Access)?;

    let (status, body) = get_with_bearer("/api/players", Some(&token)).await?;
    assert_rejected(status, &body, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"]["message"],
        serde_json::json!("Token has expired")
    );
    Ok(())
}

#[tokio::test]
async fn refresh_token_rejected_on_access_route() -> Result<()> {
    let token = codec().issue(1, Realm::Admin, TokenKind::Refresh)?;

    let (status, body) = get_with_bearer("/api/players", Some(&token)).await?;
    assert_rejected(status, &body, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn access_token_rejected_on_refresh_route() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let token = codec().issue(1, Realm::Admin, TokenKind::Access)?;
    let res = client
        .post(format!("{}/api/auth/refresh", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;

    let status = res.status();
    let body = res.json::<Value>().await?;
    assert_rejected(status, &body, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn user_realm_token_rejected_on_admin_route() -> Result<()> {
    let token = codec().issue(1, Realm::User, TokenKind::Access)?;

    let (status, body) = get_with_bearer("/api/players", Some(&token)).await?;
    assert_rejected(status, &body, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_with_missing_fields_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&serde_json::json!({ "username": "admin" }))
        .send()
        .await?;

    let status = res.status();
    let body = res.json::<Value>().await?;
    assert_rejected(status, &body, StatusCode::BAD_REQUEST);
    Ok(())
}
