//! Per-user likes.
//!
//! Both operations are idempotent. The decision to touch the counter is
//! taken from what the store actually did (a row inserted, a row
//! removed) rather than from an earlier existence check, so two racing
//! likes by the same user still move `like_count` by exactly one. The
//! composite primary key on the likes table is what rejects the second
//! insert.

use std::sync::Arc;

use blog_types::{Like, PostId};
use tracing::info;

use crate::error::ServiceError;
use crate::posts::{Counter, PostService};
use crate::store::{BlogStore, CounterDelta};

/// Operations on likes.
#[derive(Clone)]
pub struct LikeService {
    store: Arc<dyn BlogStore>,
}

impl LikeService {
    /// Create a service bound to a store.
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Record that `user_name` likes the post. Liking twice is a no-op.
    ///
    /// Returns `true` if a new like was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the post does not exist.
    pub async fn like_post(&self, post_id: PostId, user_name: &str) -> Result<bool, ServiceError> {
        let like = Like::new(post_id, user_name);

        let mut tx = self.store.begin().await?;
        PostService::fetch_in(tx.as_mut(), post_id).await?;

        if !tx.insert_like(&like).await? {
            info!(post_id = %post_id, user_name, "Like already present");
            return Ok(false);
        }

        let count =
            PostService::adjust_in(tx.as_mut(), post_id, Counter::Likes, CounterDelta::Increment)
                .await?;
        tx.commit().await?;

        info!(post_id = %post_id, user_name, like_count = count, "Post liked");
        Ok(true)
    }

    /// Remove `user_name`'s like from the post. Unliking a post that was
    /// never liked, or that does not exist, is a no-op.
    ///
    /// Returns `true` if a like was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the store fails.
    pub async fn unlike_post(
        &self,
        post_id: PostId,
        user_name: &str,
    ) -> Result<bool, ServiceError> {
        let like = Like::new(post_id, user_name);

        let mut tx = self.store.begin().await?;
        if !tx.delete_like(&like).await? {
            info!(post_id = %post_id, user_name, "No like to remove");
            return Ok(false);
        }

        let count =
            PostService::adjust_in(tx.as_mut(), post_id, Counter::Likes, CounterDelta::Decrement)
                .await?;
        tx.commit().await?;

        info!(post_id = %post_id, user_name, like_count = count, "Post unliked");
        Ok(true)
    }

    /// Whether `user_name` currently likes the post.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the store fails.
    pub async fn has_liked(&self, post_id: PostId, user_name: &str) -> Result<bool, ServiceError> {
        let like = Like::new(post_id, user_name);

        let mut tx = self.store.begin().await?;
        let exists = tx.like_exists(&like).await?;
        tx.commit().await?;
        Ok(exists)
    }
}
