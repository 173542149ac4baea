//! REST API server for the blog backend.
//!
//! This crate provides an Axum HTTP server exposing posts, comments, and
//! likes as JSON resources under `/api/posts`. Handlers are thin: they
//! parse path ids and bodies, call one service on the shared
//! [`AppState`], and translate [`blog_core::ServiceError`] into an HTTP
//! status with a `{message, detail}` body.
//!
//! The router is independent of the storage backend. Tests drive it with
//! [`AppState::in_memory`]; the server binary wires it to `PostgreSQL`.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
