//! Row fixtures for users, posts and the comment tree

use sqlx::PgPool;
use uuid::Uuid;

/// Insert a user and return its id
pub async fn create_test_user(pool: &PgPool, username: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, username, name, avatar, verified) VALUES ($1, $2, $3, $4, false)",
    )
    .bind(id)
    .bind(username)
    .bind(format!("{} Test", username))
    .bind(format!("https://cdn.test/{}.png", username))
    .execute(pool)
    .await
    .expect("Failed to insert test user");
    id
}

/// Insert a post owned by `user_id` and return its id
pub async fn create_test_post(pool: &PgPool, user_id: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO posts (id, user_id, caption, image) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(user_id)
        .bind("test caption")
        .bind("https://cdn.test/post.png")
        .execute(pool)
        .await
        .expect("Failed to insert test post");
    id
}

/// Bearer token for a test user
pub fn bearer_token(user_id: Uuid, username: &str) -> String {
    let token =
        artgram::auth::sessions::create_token(user_id, username).expect("Failed to create token");
    format!("Bearer {}", token)
}

/// Count rows in a table
pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
