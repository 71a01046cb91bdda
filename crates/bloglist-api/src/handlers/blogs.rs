//! Blog handlers
//!
//! Author: hephaex@gmail.com

use crate::audit::extract_ip_address;
use crate::auth::AuthenticatedUser;
use crate::blogs::BlogPayload;
use crate::error::{ApiJson, AppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use bloglist_core::{summarize, Blog, BlogWithOwner};
use std::sync::Arc;
use uuid::Uuid;

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id)
        .map_err(|_| AppError::BadRequest("malformatted id".to_string()))
}

/// List all blogs with their owner
#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "blogs",
    responses(
        (status = 200, description = "All blogs", body = [BlogWithOwner]),
    )
)]
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BlogWithOwner>>, AppError> {
    Ok(Json(state.blogs.list().await?))
}

/// Create a blog owned by the caller
///
/// Any owner field in the body is ignored; `likes` defaults to 0.
#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "blogs",
    request_body = BlogPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Blog created", body = Blog),
        (status = 400, description = "Missing title or url", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
    )
)]
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(payload): ApiJson<BlogPayload>,
) -> Result<(StatusCode, Json<Blog>), AppError> {
    let blog = state.blogs.create(payload, &user).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// Replace a blog's title, author, url and likes
///
/// Behind the gate under the owner-only policy; public under the permissive
/// policy, in which case no identity is attached.
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    tag = "blogs",
    request_body = BlogPayload,
    params(("id" = String, Path, description = "Blog id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blog updated", body = Blog),
        (status = 400, description = "Invalid payload or id", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Caller does not own the blog", body = crate::error::ApiError),
        (status = 404, description = "Blog not found", body = crate::error::ApiError),
    )
)]
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    user: Option<Extension<AuthenticatedUser>>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<BlogPayload>,
) -> Result<Json<Blog>, AppError> {
    let id = parse_id(&id)?;
    let requester = user.as_ref().map(|Extension(user)| user);
    let blog = state
        .blogs
        .update(id, payload, requester, extract_ip_address(&headers))
        .await?;
    Ok(Json(blog))
}

/// Delete a blog
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    tag = "blogs",
    params(("id" = String, Path, description = "Blog id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Caller does not own the blog", body = crate::error::ApiError),
        (status = 404, description = "Blog not found", body = crate::error::ApiError),
    )
)]
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state
        .blogs
        .delete(id, &user, extract_ip_address(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Aggregates over all stored blogs
///
/// Total likes, the favorite blog, and the authors with the most blogs and
/// the most likes.
#[utoipa::path(
    get,
    path = "/api/blogs/stats",
    tag = "blogs",
    responses(
        (status = 200, description = "Aggregation summary"),
    )
)]
pub async fn blog_stats(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let blogs = state.blogs.all().await?;
    Ok(Json(summarize(&blogs)).into_response())
}
