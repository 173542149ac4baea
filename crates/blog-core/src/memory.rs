//! In-memory [`BlogStore`] implementation.
//!
//! The whole dataset sits behind a single async mutex. A unit of work
//! takes the lock for its lifetime, mutates a private working copy, and
//! publishes that copy on commit. Dropping the unit of work releases the
//! lock and discards the copy, which gives serializable isolation and
//! rollback without any further bookkeeping.
//!
//! Used by the API tests and by the server when no database URL is
//! configured.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use blog_types::{Comment, CommentId, Like, Post, PostId};
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::StoreError;
use crate::store::{BlogStore, CounterDelta, StoreTx};

/// Dataset held by a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
struct MemoryData {
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    likes: BTreeSet<Like>,
    last_post_id: i32,
    last_comment_id: i32,
}

impl MemoryData {
    fn next_post_id(&mut self) -> Result<PostId, StoreError> {
        self.last_post_id = self
            .last_post_id
            .checked_add(1)
            .ok_or_else(|| StoreError::message("post id space exhausted"))?;
        Ok(PostId(self.last_post_id))
    }

    fn next_comment_id(&mut self) -> Result<CommentId, StoreError> {
        self.last_comment_id = self
            .last_comment_id
            .checked_add(1)
            .ok_or_else(|| StoreError::message("comment id space exhausted"))?;
        Ok(CommentId(self.last_comment_id))
    }
}

/// A [`BlogStore`] that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    /// Create an empty store. Identifiers start at 1.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let guard = Arc::clone(&self.data).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

const fn like_count(post: &mut Post) -> &mut u32 {
    &mut post.like_count
}

const fn comment_count(post: &mut Post) -> &mut u32 {
    &mut post.comment_count
}

/// A unit of work over a [`MemoryStore`].
struct MemoryTx {
    guard: OwnedMutexGuard<MemoryData>,
    working: MemoryData,
}

impl MemoryTx {
    fn adjust(
        &mut self,
        id: PostId,
        delta: CounterDelta,
        counter: fn(&mut Post) -> &mut u32,
    ) -> Option<u32> {
        let post = self.working.posts.get_mut(&id)?;
        let value = counter(post);
        *value = delta.apply(*value);
        let updated = *value;
        post.updated_at = Utc::now();
        Some(updated)
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn list_posts(&mut self) -> Result<Vec<Post>, StoreError> {
        Ok(self.working.posts.values().cloned().collect())
    }

    async fn find_post(&mut self, id: PostId) -> Result<Option<Post>, StoreError> {
        Ok(self.working.posts.get(&id).cloned())
    }

    async fn insert_post(&mut self, user_name: &str, content: &str) -> Result<Post, StoreError> {
        let id = self.working.next_post_id()?;
        let now = Utc::now();
        let post = Post {
            id,
            user_name: user_name.to_owned(),
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
            like_count: 0,
            comment_count: 0,
        };
        self.working.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn update_post_content(
        &mut self,
        id: PostId,
        content: &str,
    ) -> Result<Option<Post>, StoreError> {
        Ok(self.working.posts.get_mut(&id).map(|post| {
            content.clone_into(&mut post.content);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&mut self, id: PostId) -> Result<bool, StoreError> {
        if self.working.posts.remove(&id).is_none() {
            return Ok(false);
        }
        self.working.comments.retain(|_, c| c.post_id != id);
        self.working.likes.retain(|l| l.post_id != id);
        Ok(true)
    }

    async fn adjust_like_count(
        &mut self,
        id: PostId,
        delta: CounterDelta,
    ) -> Result<Option<u32>, StoreError> {
        Ok(self.adjust(id, delta, like_count))
    }

    async fn adjust_comment_count(
        &mut self,
        id: PostId,
        delta: CounterDelta,
    ) -> Result<Option<u32>, StoreError> {
        Ok(self.adjust(id, delta, comment_count))
    }

    async fn list_comments(&mut self, post_id: PostId) -> Result<Vec<Comment>, StoreError> {
        Ok(self
            .working
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find_comment(&mut self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        Ok(self.working.comments.get(&id).cloned())
    }

    async fn insert_comment(
        &mut self,
        post_id: PostId,
        user_name: &str,
        content: &str,
    ) -> Result<Comment, StoreError> {
        if !self.working.posts.contains_key(&post_id) {
            return Err(StoreError::MissingPost(post_id));
        }
        let id = self.working.next_comment_id()?;
        let now = Utc::now();
        let comment = Comment {
            id,
            post_id,
            user_name: user_name.to_owned(),
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.working.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn update_comment_content(
        &mut self,
        id: CommentId,
        content: &str,
    ) -> Result<Option<Comment>, StoreError> {
        Ok(self.working.comments.get_mut(&id).map(|comment| {
            content.clone_into(&mut comment.content);
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&mut self, id: CommentId) -> Result<bool, StoreError> {
        Ok(self.working.comments.remove(&id).is_some())
    }

    async fn like_exists(&mut self, like: &Like) -> Result<bool, StoreError> {
        Ok(self.working.likes.contains(like))
    }

    async fn insert_like(&mut self, like: &Like) -> Result<bool, StoreError> {
        if !self.working.posts.contains_key(&like.post_id) {
            return Err(StoreError::MissingPost(like.post_id));
        }
        Ok(self.working.likes.insert(like.clone()))
    }

    async fn delete_like(&mut self, like: &Like) -> Result<bool, StoreError> {
        Ok(self.working.likes.remove(like))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.insert_post("alice", "draft").await.unwrap();
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        let post = tx.insert_post("alice", "hello").await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.find_post(post.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let first = tx.insert_post("a", "1").await.unwrap();
        let second = tx.insert_post("b", "2").await.unwrap();
        assert_eq!(first.id, PostId(1));
        assert_eq!(second.id, PostId(2));
    }

    #[tokio::test]
    async fn children_require_an_existing_post() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let err = tx.insert_comment(PostId(5), "bob", "hi").await.unwrap_err();
        assert!(matches!(err, StoreError::MissingPost(PostId(5))));

        let err = tx.insert_like(&Like::new(PostId(5), "bob")).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingPost(PostId(5))));
    }

    #[tokio::test]
    async fn duplicate_like_is_not_inserted_twice() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let post = tx.insert_post("alice", "hi").await.unwrap();
        let like = Like::new(post.id, "bob");

        assert!(tx.insert_like(&like).await.unwrap());
        assert!(!tx.insert_like(&like).await.unwrap());
        assert!(tx.delete_like(&like).await.unwrap());
        assert!(!tx.delete_like(&like).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_post_cascades() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let post = tx.insert_post("alice", "hi").await.unwrap();
        let comment = tx.insert_comment(post.id, "bob", "yo").await.unwrap();
        let like = Like::new(post.id, "bob");
        tx.insert_like(&like).await.unwrap();

        assert!(tx.delete_post(post.id).await.unwrap());
        assert!(tx.find_comment(comment.id).await.unwrap().is_none());
        assert!(!tx.like_exists(&like).await.unwrap());
        assert!(!tx.delete_post(post.id).await.unwrap());
    }

    #[tokio::test]
    async fn counter_adjustments_clamp_and_report_missing_posts() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let post = tx.insert_post("alice", "hi").await.unwrap();

        assert_eq!(
            tx.adjust_like_count(post.id, CounterDelta::Decrement)
                .await
                .unwrap(),
            Some(0)
        );
        assert_eq!(
            tx.adjust_comment_count(post.id, CounterDelta::Increment)
                .await
                .unwrap(),
            Some(1)
        );
        assert_eq!(
            tx.adjust_like_count(PostId(99), CounterDelta::Increment)
                .await
                .unwrap(),
            None
        );
    }
}
