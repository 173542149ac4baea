//! `PostgreSQL` implementation of the blog store.
//!
//! Each unit of work is one `sqlx` transaction. Counter adjustments are
//! single `UPDATE ... RETURNING` statements, so two requests touching the
//! same post serialize on the row lock instead of racing a
//! read-modify-write. Likes are inserted with `ON CONFLICT DO NOTHING`
//! and the affected-row count tells the caller whether anything changed.

use async_trait::async_trait;
use blog_core::{BlogStore, CounterDelta, StoreError, StoreTx};
use blog_types::{Comment, CommentId, Like, Post, PostId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::rows::{COMMENT_COLUMNS, CommentRow, POST_COLUMNS, PostRow, counter};

const INCREMENT_LIKES: &str = r"UPDATE posts
    SET like_count = like_count + 1, updated_at = NOW()
    WHERE id = $1
    RETURNING like_count";

const DECREMENT_LIKES: &str = r"UPDATE posts
    SET like_count = GREATEST(like_count - 1, 0), updated_at = NOW()
    WHERE id = $1
    RETURNING like_count";

const INCREMENT_COMMENTS: &str = r"UPDATE posts
    SET comment_count = comment_count + 1, updated_at = NOW()
    WHERE id = $1
    RETURNING comment_count";

const DECREMENT_COMMENTS: &str = r"UPDATE posts
    SET comment_count = GREATEST(comment_count - 1, 0), updated_at = NOW()
    WHERE id = $1
    RETURNING comment_count";

/// A [`BlogStore`] backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let tx = self.pool.begin().await.map_err(DbError::from)?;
        Ok(Box::new(PgTx { tx }))
    }
}

/// A unit of work wrapping one `PostgreSQL` transaction.
///
/// Dropping it without committing rolls the transaction back.
struct PgTx {
    tx: Transaction<'static, Postgres>,
}

impl PgTx {
    async fn adjust(
        &mut self,
        sql: &'static str,
        id: PostId,
        column: &str,
    ) -> Result<Option<u32>, StoreError> {
        let value: Option<i32> = sqlx::query_scalar(sql)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(DbError::from)?;

        Ok(value.map(|v| counter(v, column)).transpose()?)
    }
}

/// Map a foreign-key violation on a child insert to
/// [`StoreError::MissingPost`].
fn missing_post_or_backend(err: sqlx::Error, post_id: PostId) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingPost(post_id);
        }
    }
    DbError::from(err).into()
}

#[async_trait]
impl StoreTx for PgTx {
    async fn list_posts(&mut self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY id"
        ))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn find_post(&mut self, id: PostId) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(row.map(Post::try_from).transpose()?)
    }

    async fn insert_post(&mut self, user_name: &str, content: &str) -> Result<Post, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts (user_name, content) VALUES ($1, $2) RETURNING {POST_COLUMNS}"
        ))
        .bind(user_name)
        .bind(content)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(Post::try_from(row)?)
    }

    async fn update_post_content(
        &mut self,
        id: PostId,
        content: &str,
    ) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(content)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(row.map(Post::try_from).transpose()?)
    }

    async fn delete_post(&mut self, id: PostId) -> Result<bool, StoreError> {
        // Comments and likes go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(DbError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_like_count(
        &mut self,
        id: PostId,
        delta: CounterDelta,
    ) -> Result<Option<u32>, StoreError> {
        let sql = match delta {
            CounterDelta::Increment => INCREMENT_LIKES,
            CounterDelta::Decrement => DECREMENT_LIKES,
        };
        self.adjust(sql, id, "like_count").await
    }

    async fn adjust_comment_count(
        &mut self,
        id: PostId,
        delta: CounterDelta,
    ) -> Result<Option<u32>, StoreError> {
        let sql = match delta {
            CounterDelta::Increment => INCREMENT_COMMENTS,
            CounterDelta::Decrement => DECREMENT_COMMENTS,
        };
        self.adjust(sql, id, "comment_count").await
    }

    async fn list_comments(&mut self, post_id: PostId) -> Result<Vec<Comment>, StoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 ORDER BY id"
        ))
        .bind(post_id.into_inner())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn find_comment(&mut self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(row.map(Comment::from))
    }

    async fn insert_comment(
        &mut self,
        post_id: PostId,
        user_name: &str,
        content: &str,
    ) -> Result<Comment, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "INSERT INTO comments (post_id, user_name, content) VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(post_id.into_inner())
        .bind(user_name)
        .bind(content)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| missing_post_or_backend(e, post_id))?;

        Ok(Comment::from(row))
    }

    async fn update_comment_content(
        &mut self,
        id: CommentId,
        content: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(content)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(row.map(Comment::from))
    }

    async fn delete_comment(&mut self, id: CommentId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(DbError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn like_exists(&mut self, like: &Like) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            r"SELECT EXISTS(
                SELECT 1 FROM likes WHERE post_id = $1 AND user_name = $2
              )",
        )
        .bind(like.post_id.into_inner())
        .bind(&like.user_name)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(DbError::from)?;

        Ok(exists)
    }

    async fn insert_like(&mut self, like: &Like) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"INSERT INTO likes (post_id, user_name)
              VALUES ($1, $2)
              ON CONFLICT (post_id, user_name) DO NOTHING",
        )
        .bind(like.post_id.into_inner())
        .bind(&like.user_name)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| missing_post_or_backend(e, like.post_id))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_like(&mut self, like: &Like) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_name = $2")
            .bind(like.post_id.into_inner())
            .bind(&like.user_name)
            .execute(&mut *self.tx)
            .await
            .map_err(DbError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }
}
