//! Comment lifecycle.
//!
//! Creating or deleting a comment also adjusts the parent post's
//! `comment_count` within the same unit of work. A comment addressed
//! through a post that does not own it is treated exactly like a missing
//! comment.

use std::sync::Arc;

use blog_types::{Comment, CommentId, CreateCommentRequest, PostId};
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::posts::{Counter, PostService};
use crate::store::{BlogStore, CounterDelta, StoreTx};

/// Operations on comments.
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn BlogStore>,
}

impl CommentService {
    /// Create a service bound to a store.
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// All comments on a post, ordered by id. A post without comments, or
    /// one that does not exist, yields an empty list.
    pub async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, ServiceError> {
        let mut tx = self.store.begin().await?;
        let comments = tx.list_comments(post_id).await?;
        tx.commit().await?;

        info!(post_id = %post_id, count = comments.len(), "Listed comments");
        Ok(comments)
    }

    /// A single comment, which must belong to `post_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the comment is missing or
    /// belongs to a different post.
    pub async fn get_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<Comment, ServiceError> {
        let mut tx = self.store.begin().await?;
        let comment = owned_comment(tx.as_mut(), post_id, comment_id).await?;
        tx.commit().await?;
        Ok(comment)
    }

    /// Add a comment to a post and increment the post's comment count.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the post does not exist.
    pub async fn create_comment(
        &self,
        post_id: PostId,
        request: &CreateCommentRequest,
    ) -> Result<Comment, ServiceError> {
        debug!(post_id = %post_id, user_name = %request.user_name, "Creating comment");

        let mut tx = self.store.begin().await?;
        PostService::fetch_in(tx.as_mut(), post_id).await?;
        let comment = tx
            .insert_comment(post_id, &request.user_name, &request.content)
            .await?;
        let count = PostService::adjust_in(
            tx.as_mut(),
            post_id,
            Counter::Comments,
            CounterDelta::Increment,
        )
        .await?;
        tx.commit().await?;

        info!(
            post_id = %post_id,
            comment_id = %comment.id,
            comment_count = count,
            "Comment created"
        );
        Ok(comment)
    }

    /// Replace a comment's content.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the comment is missing or
    /// belongs to a different post.
    pub async fn update_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        content: &str,
    ) -> Result<Comment, ServiceError> {
        let mut tx = self.store.begin().await?;
        owned_comment(tx.as_mut(), post_id, comment_id).await?;
        let comment = tx
            .update_comment_content(comment_id, content)
            .await?
            .ok_or_else(|| not_found(post_id, comment_id))?;
        tx.commit().await?;

        info!(post_id = %post_id, comment_id = %comment_id, "Comment updated");
        Ok(comment)
    }

    /// Delete a comment and decrement the post's comment count.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the comment is missing or
    /// belongs to a different post.
    pub async fn delete_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<(), ServiceError> {
        let mut tx = self.store.begin().await?;
        owned_comment(tx.as_mut(), post_id, comment_id).await?;
        if !tx.delete_comment(comment_id).await? {
            return Err(not_found(post_id, comment_id));
        }
        let count = PostService::adjust_in(
            tx.as_mut(),
            post_id,
            Counter::Comments,
            CounterDelta::Decrement,
        )
        .await?;
        tx.commit().await?;

        info!(
            post_id = %post_id,
            comment_id = %comment_id,
            comment_count = count,
            "Comment deleted"
        );
        Ok(())
    }
}

/// Load a comment and check that `post_id` owns it.
async fn owned_comment(
    tx: &mut dyn StoreTx,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<Comment, ServiceError> {
    match tx.find_comment(comment_id).await? {
        Some(comment) if comment.belongs_to(post_id) => Ok(comment),
        Some(comment) => {
            warn!(
                post_id = %post_id,
                comment_id = %comment_id,
                owner = %comment.post_id,
                "Comment belongs to another post"
            );
            Err(ServiceError::comment_not_found(post_id, comment_id))
        }
        None => Err(not_found(post_id, comment_id)),
    }
}

fn not_found(post_id: PostId, comment_id: CommentId) -> ServiceError {
    warn!(post_id = %post_id, comment_id = %comment_id, "Comment not found");
    ServiceError::comment_not_found(post_id, comment_id)
}
