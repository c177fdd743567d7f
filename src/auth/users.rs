/**
 * User Model and Database Operations
 *
 * Lookups used across the core: the acting user for notification payloads,
 * mention targets by username, follow targets by id.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique)
    pub username: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub avatar: Option<String>,
    /// Email verification flag
    pub verified: bool,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

/// Minimal user projection embedded in responses and notification payloads
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStub {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, name, avatar, verified, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get the (id, username, avatar) stub for a user
pub async fn get_user_stub(pool: &PgPool, user_id: Uuid) -> Result<Option<UserStub>, sqlx::Error> {
    let stub = sqlx::query_as::<_, UserStub>(
        r#"
        SELECT id, username, avatar
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(stub)
}

/// Get user stubs for a set of usernames
///
/// Usernames with no matching row are simply absent from the result, which
/// is what mention resolution relies on.
pub async fn get_user_stubs_by_usernames(
    pool: &PgPool,
    usernames: &[String],
) -> Result<Vec<UserStub>, sqlx::Error> {
    let stubs = sqlx::query_as::<_, UserStub>(
        r#"
        SELECT id, username, avatar
        FROM users
        WHERE username = ANY($1)
        "#,
    )
    .bind(usernames)
    .fetch_all(pool)
    .await?;

    Ok(stubs)
}
