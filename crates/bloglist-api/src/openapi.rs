//! OpenAPI document
//!
//! Served as JSON at `/api-docs/openapi.json`.

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::blogs::BlogPayload;
use crate::error::ApiError;
use crate::handlers::{auth, blogs, health, users};
use axum::Json;
use bloglist_core::{Blog, BlogWithOwner, OwnerSummary, UserPublic, UserWithBlogs};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(title = "Bloglist API", description = "Blog list with token authentication"),
    paths(
        auth::login_handler,
        users::list_users,
        users::register_user,
        blogs::list_blogs,
        blogs::create_blog,
        blogs::update_blog,
        blogs::delete_blog,
        blogs::blog_stats,
        health::health_check,
        health::readiness_check,
    ),
    components(schemas(
        ApiError,
        Blog,
        BlogPayload,
        BlogWithOwner,
        LoginRequest,
        LoginResponse,
        OwnerSummary,
        RegisterRequest,
        UserPublic,
        UserWithBlogs,
        health::HealthResponse,
        health::ReadinessResponse,
        health::ReadinessChecks,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "Registration and user listing"),
        (name = "blogs", description = "Blog records and aggregates"),
        (name = "health", description = "Liveness and readiness"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
