//! User handlers
//!
//! Author: hephaex@gmail.com

use crate::audit::{audit_log, extract_ip_address, AuditEvent};
use crate::auth::RegisterRequest;
use crate::error::{ApiJson, AppError};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use bloglist_core::{UserPublic, UserWithBlogs};
use std::sync::Arc;

/// List all users with the blogs they own
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Users with their blogs", body = [UserWithBlogs]),
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserWithBlogs>>, AppError> {
    Ok(Json(state.auth.list_users_with_blogs().await?))
}

/// Register a new user
///
/// # Responses
///
/// * `201 Created` - User registered
/// * `400 Bad Request` - Username or password shorter than 3 characters, or username taken
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserPublic),
        (status = 400, description = "Invalid input or duplicate username", body = crate::error::ApiError),
    )
)]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let ip_address = extract_ip_address(&headers);
    let username = request.username.clone();

    match state.auth.register(request).await {
        Ok(user) => {
            audit_log(&AuditEvent::RegistrationSuccess {
                user_id: user.id,
                username: user.username.clone(),
                ip_address,
            });
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(e) => {
            if let AppError::BadRequest(reason) | AppError::Conflict(reason) = &e {
                audit_log(&AuditEvent::RegistrationFailure {
                    username,
                    reason: reason.clone(),
                    ip_address,
                });
            }
            Err(e)
        }
    }
}
