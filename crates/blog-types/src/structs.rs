//! Core entity structs for the blog.
//!
//! Relations are expressed by id: a [`Comment`] and a [`Like`] carry the
//! [`PostId`] of their parent rather than a reference to the [`Post`]
//! itself, so the types stay acyclic and serialize without back-reference
//! suppression. All structs serialize with camelCase field names, which
//! is the shape the web client consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CommentId, PostId};

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A top-level content item authored by a user.
///
/// `like_count` and `comment_count` are denormalized counters maintained
/// by increment/decrement whenever a like or comment is added or removed.
/// They are never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Post {
    /// Store-assigned identity.
    pub id: PostId,
    /// Display name of the author.
    pub user_name: String,
    /// Body text.
    pub content: String,
    /// When the post was created. Never changes.
    pub created_at: DateTime<Utc>,
    /// When the post was last mutated, including counter changes.
    pub updated_at: DateTime<Utc>,
    /// Number of likes referencing this post.
    pub like_count: u32,
    /// Number of comments referencing this post.
    pub comment_count: u32,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A reply attached to a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Comment {
    /// Store-assigned identity.
    pub id: CommentId,
    /// The owning post.
    pub post_id: PostId,
    /// Display name of the author.
    pub user_name: String,
    /// Body text.
    pub content: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// When the comment was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Whether this comment belongs to the given post.
    pub fn belongs_to(&self, post_id: PostId) -> bool {
        self.post_id == post_id
    }
}

// ---------------------------------------------------------------------------
// Like
// ---------------------------------------------------------------------------

/// A user's endorsement of a [`Post`].
///
/// Identity is the `(post_id, user_name)` pair; a user can like a given
/// post at most once.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Like {
    /// The liked post.
    pub post_id: PostId,
    /// The user who liked it.
    pub user_name: String,
}

impl Like {
    /// Build the composite key for a post/user pair.
    pub fn new(post_id: PostId, user_name: &str) -> Self {
        Self {
            post_id,
            user_name: user_name.to_owned(),
        }
    }
}
