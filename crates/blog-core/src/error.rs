//! Error types for the domain services and the store seam.
//!
//! Stores report [`StoreError`]; services report [`ServiceError`]. The
//! conversion between the two turns a write against a vanished parent
//! post into a [`ServiceError::NotFound`], so callers only ever see the
//! two outcomes the API distinguishes: not found, or everything else.

use blog_types::{CommentId, PostId};

/// Errors raised by a [`BlogStore`](crate::store::BlogStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A child row referenced a post that does not exist.
    #[error("post {0} does not exist")]
    MissingPost(PostId),

    /// The backing store failed.
    #[error("storage backend error: {source}")]
    Backend {
        /// The underlying backend error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap an arbitrary backend error.
    pub fn backend<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(source),
        }
    }

    /// Build a backend error from a plain message.
    pub fn message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Backend {
            source: message.into(),
        }
    }
}

/// The kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A post.
    Post,
    /// A comment.
    Comment,
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Post => f.write_str("post"),
            Self::Comment => f.write_str("comment"),
        }
    }
}

/// Errors returned by the domain services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A post or comment was missing, or a comment was addressed through
    /// a post that does not own it.
    #[error("{resource} not found: {detail}")]
    NotFound {
        /// What kind of entity was missing.
        resource: Resource,
        /// Which lookup failed.
        detail: String,
    },

    /// The store failed for a reason other than a missing entity.
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    /// A post lookup by id failed.
    pub fn post_not_found(id: PostId) -> Self {
        Self::NotFound {
            resource: Resource::Post,
            detail: format!("no post with id {id}"),
        }
    }

    /// A comment lookup failed, or the comment belongs to another post.
    pub fn comment_not_found(post_id: PostId, comment_id: CommentId) -> Self {
        Self::NotFound {
            resource: Resource::Comment,
            detail: format!("no comment with id {comment_id} on post {post_id}"),
        }
    }

    /// Whether this error is a not-found outcome.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingPost(id) => Self::post_not_found(id),
            other @ StoreError::Backend { .. } => Self::Store(other),
        }
    }
}
