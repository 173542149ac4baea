//! REST API endpoint handlers.
//!
//! Each handler parses its path ids, delegates to one service call on the
//! shared [`AppState`], and maps the outcome to a status code. Extractor
//! rejections are taken as `Result` so they surface as [`ApiError`] with
//! the usual `{message, detail}` body instead of Axum's plain-text default.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/posts` | List all posts |
//! | `POST` | `/api/posts` | Create a post |
//! | `GET` | `/api/posts/:id` | Get single post |
//! | `PATCH` | `/api/posts/:id` | Replace post content |
//! | `DELETE` | `/api/posts/:id` | Delete post with its comments and likes |
//! | `GET` | `/api/posts/:post_id/comments` | List a post's comments |
//! | `POST` | `/api/posts/:post_id/comments` | Comment on a post |
//! | `GET` | `/api/posts/:post_id/comments/:comment_id` | Get single comment |
//! | `PATCH` | `/api/posts/:post_id/comments/:comment_id` | Replace comment content |
//! | `DELETE` | `/api/posts/:post_id/comments/:comment_id` | Delete comment |
//! | `POST` | `/api/posts/:post_id/likes` | Like a post (idempotent) |
//! | `DELETE` | `/api/posts/:post_id/likes?userName=` | Unlike a post (idempotent) |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use blog_types::{
    Comment, CommentId, CreateCommentRequest, CreatePostRequest, LikeRequest, Post, PostId,
    UpdateCommentRequest, UpdatePostRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid post id {raw:?}: {e}")))
}

fn parse_comment_id(raw: &str) -> Result<CommentId, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid comment id {raw:?}: {e}")))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// List all posts in id order.
pub async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.services.posts.list_posts().await?;
    Ok(Json(posts))
}

/// Create a post. Both counters start at zero.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(request) = payload?;
    let post = state.services.posts.create_post(&request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Get a single post by id.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&id)?;
    let post = state.services.posts.get_post(id).await?;
    Ok(Json(post))
}

/// Replace a post's content.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&id)?;
    let Json(request) = payload?;
    let post = state.services.posts.update_post(id, &request.content).await?;
    Ok(Json(post))
}

/// Delete a post and everything under it.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_post_id(&id)?;
    state.services.posts.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// List the comments on a post. A post with no comments, or no post at
/// all, yields an empty list.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let comments = state.services.comments.list_comments(post_id).await?;
    Ok(Json(comments))
}

/// Add a comment to a post.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let Json(request) = payload?;
    let comment = state
        .services
        .comments
        .create_comment(post_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Get a single comment through its post.
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Comment>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let comment_id = parse_comment_id(&comment_id)?;
    let comment = state
        .services
        .comments
        .get_comment(post_id, comment_id)
        .await?;
    Ok(Json(comment))
}

/// Replace a comment's content.
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path((post_id, comment_id)): Path<(String, String)>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let comment_id = parse_comment_id(&comment_id)?;
    let Json(request) = payload?;
    let comment = state
        .services
        .comments
        .update_comment(post_id, comment_id, &request.content)
        .await?;
    Ok(Json(comment))
}

/// Delete a comment.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let comment_id = parse_comment_id(&comment_id)?;
    state
        .services
        .comments
        .delete_comment(post_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

/// Like a post. Repeating the request is accepted and changes nothing.
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let Json(request) = payload?;
    state
        .services
        .likes
        .like_post(post_id, &request.user_name)
        .await?;
    Ok(StatusCode::CREATED)
}

/// Remove a like, identified by the `userName` query parameter.
pub async fn unlike_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    query: Result<Query<LikeRequest>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let Query(request) = query?;
    state
        .services
        .likes
        .unlike_post(post_id, &request.user_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
