//! Shared type definitions for the blog backend.
//!
//! This crate is the single source of truth for the entities and payloads
//! used across the workspace. Types flow downstream to `TypeScript` via
//! `ts-rs` for the web client.
//!
//! # Modules
//!
//! - [`ids`] -- Typed wrappers for store-assigned identifiers
//! - [`structs`] -- Posts, comments, and likes
//! - [`payloads`] -- REST request bodies and the error body

pub mod ids;
pub mod payloads;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{CommentId, PostId};
pub use payloads::{
    CreateCommentRequest, CreatePostRequest, ErrorResponse, LikeRequest, UpdateCommentRequest,
    UpdatePostRequest,
};
pub use structs::{Comment, Like, Post};
