use anyhow::{Context, Result};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Verified token payload. Attached to the request for the remainder of its
/// pipeline and discarded at response time; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Reasons the auth gate rejects a request.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing or malformed Authorization header")]
    MissingCredential,

    #[error("token is not decodable")]
    MalformedCredential,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token verification failed: {0}")]
    Verification(String),
}

/// Verify-only token validator.
///
/// Holds the decoding key loaded once at startup. The gateway never issues
/// tokens; it only checks credentials issued by the identity service against
/// the pre-shared key material, with no call back to that service.
pub struct AuthManager {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthManager {
    pub fn new(config: &Config) -> Result<Self> {
        let (algorithm, decoding_key) = if let Some(public_key) = &config.jwt_public_key {
            tracing::info!("Verifying tokens with RS256 public key");
            let key = DecodingKey::from_rsa_pem(public_key.as_bytes())
                .context("Failed to parse JWT_PUBLIC_KEY as RSA PEM")?;
            (Algorithm::RS256, key)
        } else {
            tracing::info!("Verifying tokens with HS256 shared secret");
            let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
            (Algorithm::HS256, key)
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer.clone()]);
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Auth gate entry point: extract the bearer token from the
    /// `Authorization` header and verify it.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredential)?;

        // Expected format: "Bearer <token>"
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingCredential)?;

        self.verify_token(token)
    }

    /// Decode and verify a bearer token: structure, signature against the
    /// configured key, and expiry against current time. Any failed check
    /// rejects the token outright.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(AuthError::from)?;
        Ok(token_data.claims)
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AuthError::MalformedCredential,
            _ => AuthError::Verification(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &str = "unit-test-secret-0123456789-0123456789";

    fn test_manager(issuer: Option<&str>) -> AuthManager {
        let config = Config {
            port: 0,
            auth_url: String::new(),
            application_url: String::new(),
            jwt_secret: TEST_SECRET.to_string(),
            jwt_public_key: None,
            jwt_issuer: issuer.map(String::from),
            rust_log: "info".to_string(),
        };
        AuthManager::new(&config).unwrap()
    }

    fn make_token(secret: &str, ttl_secs: i64, iss: Option<&str>) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user-42".to_string(),
            exp: now + ttl_secs,
            iat: now,
            iss: iss.map(String::from),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn verify_accepts_valid_token() {
        let manager = test_manager(None);
        let token = make_token(TEST_SECRET, 3600, None);

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-42");
    }

    #[test]
    fn verify_rejects_expired_token() {
        let manager = test_manager(None);
        // Past the default validation leeway
        let token = make_token(TEST_SECRET, -300, None);

        assert!(matches!(
            manager.verify_token(&token),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn verify_rejects_wrong_signature() {
        let manager = test_manager(None);
        let token = make_token("another-secret-0123456789-0123456789", 3600, None);

        assert!(matches!(
            manager.verify_token(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn verify_rejects_garbage_token() {
        let manager = test_manager(None);

        assert!(matches!(
            manager.verify_token("not-a-token"),
            Err(AuthError::MalformedCredential)
        ));
    }

    #[test]
    fn verify_rejects_wrong_issuer() {
        let manager = test_manager(Some("shopflow-auth"));
        let token = make_token(TEST_SECRET, 3600, Some("someone-else"));

        assert!(matches!(
            manager.verify_token(&token),
            Err(AuthError::Verification(_))
        ));
    }

    #[test]
    fn authorize_rejects_missing_header() {
        let manager = test_manager(None);
        let headers = HeaderMap::new();

        assert!(matches!(
            manager.authorize(&headers),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn authorize_rejects_non_bearer_scheme() {
        let manager = test_manager(None);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));

        assert!(matches!(
            manager.authorize(&headers),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn authorize_accepts_bearer_token() {
        let manager = test_manager(None);
        let token = make_token(TEST_SECRET, 3600, None);
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        let claims = manager.authorize(&headers).unwrap();
        assert_eq!(claims.sub, "user-42");
    }
}
