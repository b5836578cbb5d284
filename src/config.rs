use anyhow::Result;

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8000;

// Minimum length for the HS256 shared secret
const MIN_JWT_SECRET_LEN: usize = 32;

// ============================================================================
// Configuration
// ============================================================================

/// Process-wide configuration, loaded once at startup and immutable after.
#[derive(Clone, Debug)]
pub struct Config {
    /// Listening port for the gateway
    pub port: u16,
    /// Base URL of the identity service (`/auth/*` upstream); may be empty
    pub auth_url: String,
    /// Base URL of the application service (`/applications/*` upstream); may be empty
    pub application_url: String,
    /// HS256 shared secret for token verification (unused when a public key is set)
    pub jwt_secret: String,
    /// RS256 public key PEM for token verification (takes precedence over the secret)
    pub jwt_public_key: Option<String>,
    /// Expected token issuer; issuer validation is skipped when unset
    pub jwt_issuer: Option<String>,
    /// Log filter passed to tracing
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_public_key = std::env::var("JWT_PUBLIC_KEY").ok().map(load_key_material);
        let jwt_secret = if jwt_public_key.is_some() {
            // Secret is unused in RS256 mode
            std::env::var("JWT_SECRET").unwrap_or_default()
        } else {
            let secret = std::env::var("JWT_SECRET").map_err(|_| {
                anyhow::anyhow!(
                    "No JWT configuration provided. Set either:\n\
                    - JWT_PUBLIC_KEY (for RS256 verification)\n\
                    - JWT_SECRET (for HS256 verification)"
                )
            })?;
            if secret.len() < MIN_JWT_SECRET_LEN {
                anyhow::bail!(
                    "JWT_SECRET must be at least {} characters long, or use JWT_PUBLIC_KEY for RS256",
                    MIN_JWT_SECRET_LEN
                );
            }
            secret
        };

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            // An unset upstream URL is a valid degraded configuration: the
            // route stays registered and answers 500 until configured.
            auth_url: std::env::var("AUTH_URL").unwrap_or_default(),
            application_url: std::env::var("APPLICATION_URL").unwrap_or_default(),
            jwt_secret,
            jwt_public_key,
            jwt_issuer: std::env::var("JWT_ISSUER").ok(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Accepts either an inline PEM string or a path to a PEM file.
fn load_key_material(key: String) -> String {
    if key.starts_with("-----BEGIN") {
        return key;
    }
    if key.contains(std::path::MAIN_SEPARATOR) {
        return std::fs::read_to_string(&key).unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                path = %key,
                "Failed to read JWT_PUBLIC_KEY from file, using as-is"
            );
            key
        });
    }
    key
}
