//! `PostgreSQL` storage for the blog backend.
//!
//! Implements the [`blog_core::BlogStore`] seam on top of a [`sqlx`] pool.
//! Every service call runs inside one database transaction, so a comment
//! insert and the matching `comment_count` bump commit or roll back
//! together.
//!
//! # Schema
//!
//! ```text
//! posts ----< comments      (ON DELETE CASCADE)
//!   |
//!   +------< likes          (PRIMARY KEY (post_id, user_name), ON DELETE CASCADE)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, migrations
//! - [`store`] -- [`PgStore`], the transactional store implementation
//! - [`rows`] -- Row types and conversion into domain structs
//! - [`error`] -- Shared error types

pub mod error;
pub mod postgres;
pub mod rows;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use rows::{CommentRow, PostRow};
pub use store::PgStore;
