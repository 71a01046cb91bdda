//! Login handler
//!
//! Author: hephaex@gmail.com

use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::auth::{LoginRequest, LoginResponse};
use crate::error::{ApiJson, AppError};
use crate::state::AppState;
use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;

/// Login with username and password
///
/// Returns a signed access token valid for the configured lifetime. Unknown
/// usernames and wrong passwords are answered identically.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);
    let username = request.username.clone();

    match state.auth.login(request).await {
        Ok((user, response)) => {
            audit_log(&AuditEvent::LoginSuccess {
                user_id: user.id,
                username: user.username,
                ip_address,
                user_agent,
            });
            Ok(Json(response))
        }
        Err(AppError::InvalidCredentials) => {
            audit_log(&AuditEvent::LoginFailure {
                username,
                reason: "invalid username or password".to_string(),
                ip_address,
                user_agent,
            });
            Err(AppError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}
