//! Post lifecycle and denormalized counter maintenance.
//!
//! [`PostService`] owns every write to a post row, including the
//! `like_count` and `comment_count` counters. The comment and like
//! services adjust those counters through the associated functions
//! [`PostService::fetch_in`] and [`PostService::adjust_in`] so that the
//! child write and the counter write share one unit of work.

use std::sync::Arc;

use blog_types::{CreatePostRequest, Post, PostId};
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::store::{BlogStore, CounterDelta, StoreTx};

/// Which denormalized counter to adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// `Post::like_count`.
    Likes,
    /// `Post::comment_count`.
    Comments,
}

impl core::fmt::Display for Counter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Likes => f.write_str("like_count"),
            Self::Comments => f.write_str("comment_count"),
        }
    }
}

/// Operations on posts.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn BlogStore>,
}

impl PostService {
    /// Create a service bound to a store.
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// All posts, ordered by id.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ServiceError> {
        let mut tx = self.store.begin().await?;
        let posts = tx.list_posts().await?;
        tx.commit().await?;

        info!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    /// A single post.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no post has this id.
    pub async fn get_post(&self, id: PostId) -> Result<Post, ServiceError> {
        let mut tx = self.store.begin().await?;
        let post = Self::fetch_in(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(post)
    }

    /// Create a post. Both counters start at zero.
    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ServiceError> {
        debug!(user_name = %request.user_name, "Creating post");

        let mut tx = self.store.begin().await?;
        let post = tx.insert_post(&request.user_name, &request.content).await?;
        tx.commit().await?;

        info!(post_id = %post.id, user_name = %post.user_name, "Post created");
        Ok(post)
    }

    /// Replace a post's content.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no post has this id.
    pub async fn update_post(&self, id: PostId, content: &str) -> Result<Post, ServiceError> {
        let mut tx = self.store.begin().await?;
        let post = tx
            .update_post_content(id, content)
            .await?
            .ok_or_else(|| not_found(id))?;
        tx.commit().await?;

        info!(post_id = %id, "Post updated");
        Ok(post)
    }

    /// Delete a post and, through the store's cascade, its comments and
    /// likes.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no post has this id.
    pub async fn delete_post(&self, id: PostId) -> Result<(), ServiceError> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_post(id).await? {
            return Err(not_found(id));
        }
        tx.commit().await?;

        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Add one to the like count. Returns the new count.
    pub async fn increment_like_count(&self, id: PostId) -> Result<u32, ServiceError> {
        self.adjust(id, Counter::Likes, CounterDelta::Increment).await
    }

    /// Subtract one from the like count, stopping at zero. Returns the new
    /// count.
    pub async fn decrement_like_count(&self, id: PostId) -> Result<u32, ServiceError> {
        self.adjust(id, Counter::Likes, CounterDelta::Decrement).await
    }

    /// Add one to the comment count. Returns the new count.
    pub async fn increment_comment_count(&self, id: PostId) -> Result<u32, ServiceError> {
        self.adjust(id, Counter::Comments, CounterDelta::Increment)
            .await
    }

    /// Subtract one from the comment count, stopping at zero. Returns the
    /// new count.
    pub async fn decrement_comment_count(&self, id: PostId) -> Result<u32, ServiceError> {
        self.adjust(id, Counter::Comments, CounterDelta::Decrement)
            .await
    }

    async fn adjust(
        &self,
        id: PostId,
        counter: Counter,
        delta: CounterDelta,
    ) -> Result<u32, ServiceError> {
        let mut tx = self.store.begin().await?;
        let value = Self::adjust_in(tx.as_mut(), id, counter, delta).await?;
        tx.commit().await?;
        Ok(value)
    }

    /// Load a post inside an open unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no post has this id.
    pub async fn fetch_in(tx: &mut dyn StoreTx, id: PostId) -> Result<Post, ServiceError> {
        tx.find_post(id).await?.ok_or_else(|| not_found(id))
    }

    /// Adjust a counter inside an open unit of work.
    ///
    /// The adjustment is a single atomic store operation, so concurrent
    /// adjustments of the same post cannot overwrite one another.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no post has this id.
    pub async fn adjust_in(
        tx: &mut dyn StoreTx,
        id: PostId,
        counter: Counter,
        delta: CounterDelta,
    ) -> Result<u32, ServiceError> {
        let adjusted = match counter {
            Counter::Likes => tx.adjust_like_count(id, delta).await?,
            Counter::Comments => tx.adjust_comment_count(id, delta).await?,
        };
        let value = adjusted.ok_or_else(|| not_found(id))?;

        debug!(post_id = %id, %counter, ?delta, value, "Counter adjusted");
        Ok(value)
    }
}

fn not_found(id: PostId) -> ServiceError {
    warn!(post_id = %id, "Post not found");
    ServiceError::post_not_found(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn service() -> PostService {
        PostService::new(Arc::new(MemoryStore::new()))
    }

    fn request(user_name: &str, content: &str) -> CreatePostRequest {
        CreatePostRequest {
            user_name: user_name.to_owned(),
            content: content.to_owned(),
        }
    }

    #[tokio::test]
    async fn new_posts_start_with_zero_counters() {
        let posts = service();
        let post = posts.create_post(&request("alice", "hi")).await.unwrap();

        assert_eq!(post.id, PostId(1));
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.created_at, post.updated_at);
    }

    #[tokio::test]
    async fn missing_posts_are_not_found() {
        let posts = service();

        assert!(posts.get_post(PostId(4)).await.unwrap_err().is_not_found());
        assert!(
            posts
                .update_post(PostId(4), "x")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(posts.delete_post(PostId(4)).await.unwrap_err().is_not_found());
        assert!(
            posts
                .increment_like_count(PostId(4))
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn update_replaces_content_and_refreshes_timestamp() {
        let posts = service();
        let created = posts.create_post(&request("alice", "hi")).await.unwrap();

        let updated = posts.update_post(created.id, "edited").await.unwrap();
        assert_eq!(updated.content, "edited");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(posts.get_post(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn counters_move_by_one_and_never_go_negative() {
        let posts = service();
        let post = posts.create_post(&request("alice", "hi")).await.unwrap();

        assert_eq!(posts.increment_like_count(post.id).await.unwrap(), 1);
        assert_eq!(posts.increment_like_count(post.id).await.unwrap(), 2);
        assert_eq!(posts.decrement_like_count(post.id).await.unwrap(), 1);

        assert_eq!(posts.decrement_comment_count(post.id).await.unwrap(), 0);
        assert_eq!(posts.increment_comment_count(post.id).await.unwrap(), 1);

        let post = posts.get_post(post.id).await.unwrap();
        assert_eq!(post.like_count, 1);
        assert_eq!(post.comment_count, 1);
    }

    #[tokio::test]
    async fn list_returns_posts_in_id_order() {
        let posts = service();
        posts.create_post(&request("alice", "one")).await.unwrap();
        posts.create_post(&request("bob", "two")).await.unwrap();

        let listed = posts.list_posts().await.unwrap();
        let ids: Vec<PostId> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PostId(1), PostId(2)]);
    }

    #[tokio::test]
    async fn delete_removes_the_post() {
        let posts = service();
        let post = posts.create_post(&request("alice", "hi")).await.unwrap();

        posts.delete_post(post.id).await.unwrap();
        assert!(posts.get_post(post.id).await.unwrap_err().is_not_found());
        assert!(posts.list_posts().await.unwrap().is_empty());
    }
}
