//! Axum router construction for the REST API.
//!
//! Assembles all routes into a single [`Router`] with CORS and request
//! tracing middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// How long browsers may cache a preflight response.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET|POST /api/posts`
/// - `GET|PATCH|DELETE /api/posts/:post_id`
/// - `GET|POST /api/posts/:post_id/comments`
/// - `GET|PATCH|DELETE /api/posts/:post_id/comments/:comment_id`
/// - `POST|DELETE /api/posts/:post_id/likes`
///
/// CORS allows any origin and header, without credentials.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE);

    Router::new()
        // Posts
        .route(
            "/api/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/posts/{post_id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        // Comments
        .route(
            "/api/posts/{post_id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/api/posts/{post_id}/comments/{comment_id}",
            get(handlers::get_comment)
                .patch(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
        // Likes
        .route(
            "/api/posts/{post_id}/likes",
            post(handlers::like_post).delete(handlers::unlike_post),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
