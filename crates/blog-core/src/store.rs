//! Repository seam between the domain services and persistent storage.
//!
//! A [`BlogStore`] hands out units of work ([`StoreTx`]). Every service
//! call opens exactly one unit of work, performs its reads and writes
//! through it, and commits. A unit of work dropped without
//! [`commit`](StoreTx::commit) is rolled back, so an error returned
//! half-way through a service call leaves no partial writes behind.
//!
//! Two implementations exist: the `PostgreSQL` store in `blog-db`, and the
//! in-memory [`MemoryStore`](crate::memory::MemoryStore) used by tests and
//! local runs.

use async_trait::async_trait;
use blog_types::{Comment, CommentId, Like, Post, PostId};

use crate::error::StoreError;

/// Direction of a denormalized counter adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterDelta {
    /// Add one.
    Increment,
    /// Subtract one, stopping at zero.
    Decrement,
}

impl CounterDelta {
    /// Apply this delta to a counter value. Decrements clamp at zero.
    pub const fn apply(self, value: u32) -> u32 {
        match self {
            Self::Increment => value.saturating_add(1),
            Self::Decrement => value.saturating_sub(1),
        }
    }
}

/// A source of units of work.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Open a new unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the store cannot start a
    /// transaction (for example, the connection pool is exhausted).
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError>;
}

/// A single unit of work against the store.
///
/// All reads observe the writes made earlier in the same unit of work.
/// Counter adjustments are applied atomically by the store itself rather
/// than read, modified, and written back by the caller.
#[async_trait]
pub trait StoreTx: Send {
    // -- posts --------------------------------------------------------------

    /// All posts, ordered by id.
    async fn list_posts(&mut self) -> Result<Vec<Post>, StoreError>;

    /// Look up a post by id.
    async fn find_post(&mut self, id: PostId) -> Result<Option<Post>, StoreError>;

    /// Insert a post with both counters at zero and return it.
    async fn insert_post(&mut self, user_name: &str, content: &str) -> Result<Post, StoreError>;

    /// Replace a post's content, refreshing `updated_at`. Returns `None`
    /// if the post does not exist.
    async fn update_post_content(
        &mut self,
        id: PostId,
        content: &str,
    ) -> Result<Option<Post>, StoreError>;

    /// Delete a post together with its comments and likes. Returns
    /// whether the post existed.
    async fn delete_post(&mut self, id: PostId) -> Result<bool, StoreError>;

    /// Atomically adjust a post's like count, refreshing `updated_at`.
    /// Returns the new count, or `None` if the post does not exist.
    async fn adjust_like_count(
        &mut self,
        id: PostId,
        delta: CounterDelta,
    ) -> Result<Option<u32>, StoreError>;

    /// Atomically adjust a post's comment count, refreshing `updated_at`.
    /// Returns the new count, or `None` if the post does not exist.
    async fn adjust_comment_count(
        &mut self,
        id: PostId,
        delta: CounterDelta,
    ) -> Result<Option<u32>, StoreError>;

    // -- comments -----------------------------------------------------------

    /// All comments on a post, ordered by id.
    async fn list_comments(&mut self, post_id: PostId) -> Result<Vec<Comment>, StoreError>;

    /// Look up a comment by id, regardless of owning post.
    async fn find_comment(&mut self, id: CommentId) -> Result<Option<Comment>, StoreError>;

    /// Insert a comment under a post.
    ///
    /// Fails with [`StoreError::MissingPost`] if the post does not exist.
    async fn insert_comment(
        &mut self,
        post_id: PostId,
        user_name: &str,
        content: &str,
    ) -> Result<Comment, StoreError>;

    /// Replace a comment's content, refreshing `updated_at`. Returns
    /// `None` if the comment does not exist.
    async fn update_comment_content(
        &mut self,
        id: CommentId,
        content: &str,
    ) -> Result<Option<Comment>, StoreError>;

    /// Delete a comment. Returns whether it existed.
    async fn delete_comment(&mut self, id: CommentId) -> Result<bool, StoreError>;

    // -- likes --------------------------------------------------------------

    /// Whether the post/user pair exists.
    async fn like_exists(&mut self, like: &Like) -> Result<bool, StoreError>;

    /// Insert the pair unless it already exists. Returns `true` only if a
    /// row was inserted.
    ///
    /// Fails with [`StoreError::MissingPost`] if the post does not exist.
    async fn insert_like(&mut self, like: &Like) -> Result<bool, StoreError>;

    /// Delete the pair. Returns `true` only if a row was removed.
    async fn delete_like(&mut self, like: &Like) -> Result<bool, StoreError>;

    // -- lifecycle ----------------------------------------------------------

    /// Make every write in this unit of work durable.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_clamps_at_zero() {
        assert_eq!(CounterDelta::Decrement.apply(0), 0);
        assert_eq!(CounterDelta::Decrement.apply(3), 2);
        assert_eq!(CounterDelta::Increment.apply(0), 1);
    }
}
