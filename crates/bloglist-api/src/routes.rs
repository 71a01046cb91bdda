//! API route definitions
//!
//! Author: hephaex@gmail.com

use crate::auth::middleware::auth_middleware;
use crate::handlers::{auth, blogs, users};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use bloglist_core::OwnershipPolicy;
use std::sync::Arc;

/// Create `/api` routes
///
/// `PUT /blogs/:id` sits behind the authorization gate only under the
/// owner-only policy.
pub fn api_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let mut public_routes = Router::new()
        .route("/login", post(auth::login_handler))
        .route("/users", get(users::list_users).post(users::register_user))
        .route("/blogs", get(blogs::list_blogs))
        .route("/blogs/stats", get(blogs::blog_stats));

    // Protected routes (authentication required)
    let mut protected_routes = Router::new()
        .route("/blogs", post(blogs::create_blog))
        .route("/blogs/:id", delete(blogs::delete_blog));

    match state.config.auth.ownership_policy {
        OwnershipPolicy::OwnerOnly => {
            protected_routes = protected_routes.route("/blogs/:id", put(blogs::update_blog));
        }
        OwnershipPolicy::Permissive => {
            public_routes = public_routes.route("/blogs/:id", put(blogs::update_blog));
        }
    }

    let protected_routes = protected_routes.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new().merge(public_routes).merge(protected_routes)
}
