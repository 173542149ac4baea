//! Domain core of the blog backend.
//!
//! The services in this crate own the lifecycle of posts, comments, and
//! likes, and keep the denormalized `like_count` / `comment_count` on each
//! post in step with its children. Every service call runs inside one
//! store unit of work, so a child write and its counter write commit or
//! roll back together.
//!
//! # Architecture
//!
//! ```text
//! API handler
//!     |
//!     +-- BlogServices { posts, comments, likes }
//!             |
//!             +-- BlogStore::begin() --> StoreTx (one per call)
//!                     |-- PgStore     (blog-db, PostgreSQL)
//!                     +-- MemoryStore (tests, local runs)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The repository seam (`BlogStore`, `StoreTx`)
//! - [`posts`] -- Post lifecycle and counter maintenance
//! - [`comments`] -- Comment lifecycle
//! - [`likes`] -- Idempotent like/unlike
//! - [`memory`] -- In-memory store
//! - [`config`] -- YAML configuration with environment overrides
//! - [`error`] -- Store and service errors

pub mod comments;
pub mod config;
pub mod error;
pub mod likes;
pub mod memory;
pub mod posts;
pub mod services;
pub mod store;

// Re-export primary types for convenience.
pub use comments::CommentService;
pub use config::{BlogConfig, ConfigError};
pub use error::{Resource, ServiceError, StoreError};
pub use likes::LikeService;
pub use memory::MemoryStore;
pub use posts::{Counter, PostService};
pub use services::BlogServices;
pub use store::{BlogStore, CounterDelta, StoreTx};
