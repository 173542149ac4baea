//! Request payloads accepted by the REST API.
//!
//! These mirror the JSON bodies the web client sends. Only the fields a
//! given operation needs are present; ids always come from the URL path.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CreatePostRequest {
    /// Author display name.
    pub user_name: String,
    /// Body text.
    pub content: String,
}

/// Body of `PATCH /api/posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UpdatePostRequest {
    /// Replacement body text.
    pub content: String,
}

/// Body of `POST /api/posts/{postId}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CreateCommentRequest {
    /// Author display name.
    pub user_name: String,
    /// Body text.
    pub content: String,
}

/// Body of `PATCH /api/posts/{postId}/comments/{commentId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UpdateCommentRequest {
    /// Replacement body text.
    pub content: String,
}

/// Body of `POST /api/posts/{postId}/likes`, and the query string of
/// `DELETE /api/posts/{postId}/likes?userName=...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct LikeRequest {
    /// The user liking or unliking the post.
    pub user_name: String,
}

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorResponse {
    /// Short, client-facing summary.
    pub message: String,
    /// Underlying cause.
    pub detail: String,
}
