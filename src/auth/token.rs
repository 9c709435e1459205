use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Token lifetime class. Access tokens authorize API calls; refresh tokens
/// only mint new access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Which account space the token belongs to. Admin-console tokens and
/// end-user app tokens share the codec but are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub realm: Realm,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Authentication token is missing")]
    Missing,
    #[error("Signature verification failed")]
    Malformed,
    #[error("Token has expired")]
    Expired,
    #[error("Wrong token kind presented")]
    WrongKind { expected: TokenKind, found: TokenKind },
    #[error("Token belongs to a different realm")]
    WrongRealm,
    #[error("Signing secret is not configured")]
    SecretMissing,
}

/// Encodes and decodes signed, time-bound claim sets. Stateless: a verified,
/// unexpired token is always accepted — there is no revocation store, and
/// logout is a client-side discard.
pub struct TokenCodec {
    secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.jwt_secret.clone(),
            access_ttl_secs: security.access_token_ttl_secs,
            refresh_ttl_secs: security.refresh_token_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Produce a signed token for the subject. Refuses to issue when the
    /// signing secret is unset.
    pub fn issue(&self, subject: i32, realm: Realm, kind: TokenKind) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::SecretMissing);
        }

        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        let exp = (now + Duration::seconds(ttl)).timestamp();

        let claims = Claims {
            sub: subject,
            realm,
            kind,
            iat: now.timestamp(),
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| TokenError::Malformed)
    }

    /// Verify signature and expiry. A token is accepted up to its exact
    /// expiry instant and rejected afterwards.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::SecretMissing);
        }

        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })
    }

    /// Verify and additionally require a realm and kind. Signature and
    /// expiry problems take precedence over kind mismatches.
    pub fn verify_expecting(
        &self,
        token: &str,
        realm: Realm,
        kind: TokenKind,
    ) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;

        if claims.realm != realm {
            return Err(TokenError::WrongRealm);
        }
        if claims.kind != kind {
            return Err(TokenError::WrongKind {
                expected: kind,
                found: claims.kind,
            });
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;

    fn security(secret: &str) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: secret.to_string(),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 30 * 24 * 3600,
            cors_origins: vec![],
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&security("test-secret-key-for-unit-tests"))
    }

    #[test]
    fn test_access_expiry_is_one_hour_after_issuance() {
        let codec = codec();
        let token = codec.issue(7, Realm::Admin, TokenKind::Access).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.sub, 7);
    }

    #[test]
    fn test_refresh_expiry_is_thirty_days() {
        let codec = codec();
        let token = codec.issue(7, Realm::Admin, TokenKind::Refresh).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);
    }

    #[test]
    fn test_tampered_signature_is_malformed_not_expired() {
        let codec = codec();
        let token = codec.issue(7, Realm::Admin, TokenKind::Access).unwrap();

        // Flip the last signature character
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(codec.verify(&tampered), Err(TokenError::Malformed));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        assert_eq!(codec().verify("not-a-token"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_expired_token_reports_expired() {
        let mut config = security("test-secret-key-for-unit-tests");
        config.access_token_ttl_secs = -10;
        let codec = TokenCodec::new(&config);

        let token = codec.issue(7, Realm::Admin, TokenKind::Access).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_refresh_token_rejected_where_access_required() {
        let codec = codec();
        let token = codec.issue(7, Realm::Admin, TokenKind::Refresh).unwrap();

        assert_eq!(
            codec.verify_expecting(&token, Realm::Admin, TokenKind::Access),
            Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh,
            })
        );
    }

    #[test]
    fn test_access_token_rejected_where_refresh_required() {
        let codec = codec();
        let token = codec.issue(7, Realm::Admin, TokenKind::Access).unwrap();

        assert!(matches!(
            codec.verify_expecting(&token, Realm::Admin, TokenKind::Refresh),
            Err(TokenError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_user_token_rejected_in_admin_realm() {
        let codec = codec();
        let token = codec.issue(7, Realm::User, TokenKind::Access).unwrap();

        assert_eq!(
            codec.verify_expecting(&token, Realm::Admin, TokenKind::Access),
            Err(TokenError::WrongRealm)
        );
    }

    #[test]
    fn test_empty_secret_fails_closed() {
        let codec = TokenCodec::new(&security(""));

        assert_eq!(
            codec.issue(7, Realm::Admin, TokenKind::Access),
            Err(TokenError::SecretMissing)
        );
        assert_eq!(codec.verify("anything"), Err(TokenError::SecretMissing));
    }

    #[test]
    fn test_different_secret_cannot_verify() {
        let token = codec().issue(7, Realm::Admin, TokenKind::Access).unwrap();
        let other = TokenCodec::new(&security("a-completely-different-secret"));

        assert_eq!(other.verify(&token), Err(TokenError::Malformed));
    }
}
