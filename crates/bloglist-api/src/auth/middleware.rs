//! Authentication middleware for protecting routes
//!
//! Extracts and validates the bearer token from the Authorization header,
//! re-fetches the token's subject from the credential store and adds the
//! resolved identity to the request extensions. Every rejection produces the
//! same 401 body; the precise reason goes to the audit log only.

use super::jwt::{validate_access_token, JwtError};
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bloglist_core::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Authenticated user resolved from a verified token
///
/// Added to request extensions by [`auth_middleware`]; extract it in
/// handlers with `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User's unique identifier
    pub user_id: Uuid,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            name: user.name,
        }
    }
}

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Token subject no longer exists")]
    UnknownUser,

    #[error("Credential store unavailable: {0}")]
    Store(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Store(msg) => AppError::Database(msg).into_response(),
            _ => AppError::Unauthorized.into_response(),
        }
    }
}

/// Token from a `Bearer <token>` header value
fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = bearer_token(auth_header).ok_or(AuthError::InvalidAuthHeader)?;

    let claims = validate_access_token(&state.jwt_config, token)?;
    let user_id = claims.user_id()?;

    let user = state
        .auth
        .resolve(user_id)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    Ok(AuthenticatedUser::from(user))
}

/// Authentication middleware that requires a valid token
///
/// # Usage
///
/// ```ignore
/// use axum::{Router, routing::post, middleware};
/// use bloglist_api::auth::middleware::auth_middleware;
///
/// let app = Router::new()
///     .route("/api/blogs", post(create_blog))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match authenticate(&state, request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Err(AuthError::Store(msg)) => Err(AuthError::Store(msg)),
        Err(e) => {
            audit_log(&AuditEvent::InvalidToken {
                ip_address: extract_ip_address(request.headers()),
                user_agent: extract_user_agent(request.headers()),
                reason: e.to_string(),
            });
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }

    #[test]
    fn test_authenticated_user_from_user() {
        let user = User::new("mluukkai", "Matti Luukkainen", "hash");
        let id = user.id;

        let authenticated = AuthenticatedUser::from(user);
        assert_eq!(authenticated.user_id, id);
        assert_eq!(authenticated.username, "mluukkai");
        assert_eq!(authenticated.name, "Matti Luukkainen");
    }

    #[tokio::test]
    async fn test_rejections_share_one_body() {
        let errors = vec![
            AuthError::MissingAuthHeader,
            AuthError::InvalidAuthHeader,
            AuthError::InvalidToken(JwtError::Malformed),
            AuthError::InvalidToken(JwtError::BadSignature),
            AuthError::InvalidToken(JwtError::Expired),
            AuthError::UnknownUser,
        ];

        let mut bodies = Vec::new();
        for error in errors {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            bodies.push(to_bytes(response.into_body(), usize::MAX).await.unwrap());
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        let text = String::from_utf8(bodies[0].to_vec()).unwrap();
        assert!(!text.contains("expired"));
        assert!(!text.contains("signature"));
    }

    #[test]
    fn test_store_failure_is_server_error() {
        let error = AuthError::Store("connection refused".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
