//! Database operations for mirrored follow edges

use sqlx::PgPool;
use uuid::Uuid;

/// Is `follower_id` currently following `followed_id`?
pub async fn is_following(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM followings
            WHERE user_id = $1 AND following_id = $2
        )
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Create both mirrored edges in one transaction
pub async fn create_follow_edges(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO followings (user_id, following_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, following_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO followers (user_id, follower_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, follower_id) DO NOTHING
        "#,
    )
    .bind(followed_id)
    .bind(follower_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}

/// Remove both mirrored edges in one transaction
pub async fn delete_follow_edges(
    pool: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM followings
        WHERE user_id = $1 AND following_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM followers
        WHERE user_id = $1 AND follower_id = $2
        "#,
    )
    .bind(followed_id)
    .bind(follower_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}
