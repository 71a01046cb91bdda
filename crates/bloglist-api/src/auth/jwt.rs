//! JWT token generation and validation
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing.
//! Access tokens carry the user's id and username and expire after a
//! configurable lifetime. The signing secret is always passed in through
//! [`JwtConfig`], so any process holding the same secret can verify a token.

use bloglist_core::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// JWT Claims structure containing user information
///
/// These claims are embedded in the access token and extracted during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - user ID
    pub sub: String,
    /// Username of the subject
    pub username: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

impl Claims {
    /// Subject as a user id
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::Malformed)
    }
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
///
/// Contains settings for token generation and validation
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Access token expiration time in seconds (default: 3600 = 1 hour)
    pub access_expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            access_expiration_secs: auth.token_ttl_secs,
            issuer: auth.issuer.clone(),
        }
    }
}

fn now_secs() -> Result<u64, JwtError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Generate a JWT access token for an authenticated user
///
/// # Example
///
/// ```no_run
/// use bloglist_api::auth::jwt::{generate_access_token, JwtConfig};
/// use uuid::Uuid;
///
/// let config = JwtConfig::default();
/// let token = generate_access_token(&config, Uuid::new_v4(), "mluukkai")
///     .expect("Failed to generate token");
/// ```
pub fn generate_access_token(
    config: &JwtConfig,
    user_id: Uuid,
    username: &str,
) -> Result<String, JwtError> {
    generate_access_token_at(config, user_id, username, now_secs()?)
}

/// Generate a token as if issued at `issued_at` (Unix seconds)
pub fn generate_access_token_at(
    config: &JwtConfig,
    user_id: Uuid,
    username: &str,
    issued_at: u64,
) -> Result<String, JwtError> {
    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: issued_at,
        exp: issued_at.saturating_add(config.access_expiration_secs),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a JWT access token and extract claims
///
/// # Returns
///
/// * `Ok(Claims)` - Decoded and validated claims
/// * `Err(JwtError::Malformed)` - Token cannot be decoded
/// * `Err(JwtError::BadSignature)` - Signature does not match
/// * `Err(JwtError::Expired)` - Current time is past `exp`
pub fn validate_access_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::BadSignature,
        _ => JwtError::Malformed,
    })?;

    Ok(token_data.claims)
}
