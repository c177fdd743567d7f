//! Database operations for toggle-likes
//!
//! Each toggle is a find-then-create/delete pair; the `UNIQUE (target,
//! user)` constraints in the schema guarantee that even racing toggles can
//! never leave two rows for the same pair.

use sqlx::PgPool;
use uuid::Uuid;

/// Comment fields needed to notify on a comment like
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentLikeTarget {
    pub author_id: Uuid,
    pub message: String,
    pub post_id: Uuid,
    pub post_image: Option<String>,
}

/// Get the notification context for liking a comment
pub async fn get_comment_like_target(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<CommentLikeTarget>, sqlx::Error> {
    let target = sqlx::query_as::<_, CommentLikeTarget>(
        r#"
        SELECT c.author_id, c.message, p.id AS post_id, p.image AS post_image
        FROM comments c
        JOIN posts p ON p.id = c.post_id
        WHERE c.id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(target)
}

/// Toggle a like on a comment; returns true when the comment is now liked
pub async fn toggle_comment_like(
    pool: &PgPool,
    comment_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let existing: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM comment_likes
        WHERE comment_id = $1 AND user_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(like_id) => {
            sqlx::query("DELETE FROM comment_likes WHERE id = $1")
                .bind(like_id)
                .execute(pool)
                .await?;
            Ok(false)
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO comment_likes (id, comment_id, user_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (comment_id, user_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(comment_id)
            .bind(user_id)
            .execute(pool)
            .await?;
            Ok(true)
        }
    }
}

/// Toggle a like on a post; returns true when the post is now liked
pub async fn toggle_post_like(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let existing: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM post_likes
        WHERE post_id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(like_id) => {
            sqlx::query("DELETE FROM post_likes WHERE id = $1")
                .bind(like_id)
                .execute(pool)
                .await?;
            Ok(false)
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO post_likes (id, post_id, user_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (post_id, user_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?;
            Ok(true)
        }
    }
}

/// Toggle a like on a reply; returns true when the reply is now liked
pub async fn toggle_reply_like(
    pool: &PgPool,
    reply_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let existing: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM reply_likes
        WHERE reply_id = $1 AND user_id = $2
        "#,
    )
    .bind(reply_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(like_id) => {
            sqlx::query("DELETE FROM reply_likes WHERE id = $1")
                .bind(like_id)
                .execute(pool)
                .await?;
            Ok(false)
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO reply_likes (id, reply_id, user_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (reply_id, user_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(reply_id)
            .bind(user_id)
            .execute(pool)
            .await?;
            Ok(true)
        }
    }
}
