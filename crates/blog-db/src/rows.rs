//! Row types read back from the `posts` and `comments` tables.
//!
//! Rows carry the raw column types; conversion into the domain structs
//! checks that counters are non-negative.

use blog_types::{Comment, CommentId, Post, PostId};
use chrono::{DateTime, Utc};

use crate::error::DbError;

/// Column list matching [`PostRow`].
pub(crate) const POST_COLUMNS: &str =
    "id, user_name, content, created_at, updated_at, like_count, comment_count";

/// Column list matching [`CommentRow`].
pub(crate) const COMMENT_COLUMNS: &str = "id, post_id, user_name, content, created_at, updated_at";

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    /// Identity column.
    pub id: i32,
    /// Author display name.
    pub user_name: String,
    /// Body text.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
    /// Denormalized like counter.
    pub like_count: i32,
    /// Denormalized comment counter.
    pub comment_count: i32,
}

impl TryFrom<PostRow> for Post {
    type Error = DbError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PostId(row.id),
            user_name: row.user_name,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            like_count: counter(row.like_count, "like_count")?,
            comment_count: counter(row.comment_count, "comment_count")?,
        })
    }
}

/// A row from the `comments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    /// Identity column.
    pub id: i32,
    /// Owning post.
    pub post_id: i32,
    /// Author display name.
    pub user_name: String,
    /// Body text.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId(row.id),
            post_id: PostId(row.post_id),
            user_name: row.user_name,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Convert a stored counter, rejecting negative values.
pub(crate) fn counter(value: i32, column: &str) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|e| DbError::CorruptRow(format!("{column} = {value}: {e}")))
}
