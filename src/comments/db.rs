//! Database operations for the comment/reply tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A persisted comment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted reply; `parent_id` references a comment or another reply
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub author_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Post fields the comment flow needs (owner and image for notifications)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostMeta {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image: Option<String>,
}

/// The node a reply attaches to
#[derive(Debug, Clone)]
pub enum ParentNode {
    Comment(Comment),
    Reply(Reply),
}

/// Get the post fields needed by the comment flow
pub async fn get_post_meta(pool: &PgPool, post_id: Uuid) -> Result<Option<PostMeta>, sqlx::Error> {
    let meta = sqlx::query_as::<_, PostMeta>(
        r#"
        SELECT id, user_id, image
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(meta)
}

/// Get a comment by id
pub async fn get_comment(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, author_id, message, created_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Get a reply by id
pub async fn get_reply(pool: &PgPool, reply_id: Uuid) -> Result<Option<Reply>, sqlx::Error> {
    let reply = sqlx::query_as::<_, Reply>(
        r#"
        SELECT id, parent_id, author_id, message, created_at
        FROM comment_replies
        WHERE id = $1
        "#,
    )
    .bind(reply_id)
    .fetch_optional(pool)
    .await?;

    Ok(reply)
}

/// Resolve the node a new reply attaches to
///
/// Replies are checked first: an id that is both would be a collision of
/// UUIDs, so order only matters for the lookup count.
pub async fn get_parent_node(pool: &PgPool, parent_id: Uuid) -> Result<Option<ParentNode>, sqlx::Error> {
    if let Some(reply) = get_reply(pool, parent_id).await? {
        return Ok(Some(ParentNode::Reply(reply)));
    }
    if let Some(comment) = get_comment(pool, parent_id).await? {
        return Ok(Some(ParentNode::Comment(comment)));
    }
    Ok(None)
}

/// Walk `parent_id` links upward from a reply to its ancestor comment
///
/// The chain terminates because parents are fixed at insert (no cycles).
/// Returns `None` when the chain dangles into a concurrently deleted node.
pub async fn resolve_ancestor_comment(
    pool: &PgPool,
    reply: &Reply,
) -> Result<Option<Comment>, sqlx::Error> {
    let mut cursor = reply.parent_id;
    loop {
        if let Some(comment) = get_comment(pool, cursor).await? {
            return Ok(Some(comment));
        }
        match get_reply(pool, cursor).await? {
            Some(parent_reply) => cursor = parent_reply.parent_id,
            None => return Ok(None),
        }
    }
}

/// Create a comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    message: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, post_id, author_id, message, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, post_id, author_id, message, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(post_id)
    .bind(author_id)
    .bind(message)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Create a reply under a comment or another reply
pub async fn create_reply(
    pool: &PgPool,
    parent_id: Uuid,
    author_id: Uuid,
    message: &str,
) -> Result<Reply, sqlx::Error> {
    let reply = sqlx::query_as::<_, Reply>(
        r#"
        INSERT INTO comment_replies (id, parent_id, author_id, message, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, parent_id, author_id, message, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(parent_id)
    .bind(author_id)
    .bind(message)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(reply)
}

/// Update a comment's message, scoped to its author
///
/// The `(id, author_id)` scope makes the authorization check race-free;
/// zero rows affected covers both "missing" and "not the author".
pub async fn update_comment_scoped(
    pool: &PgPool,
    comment_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET message = $3
        WHERE id = $1 AND author_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(author_id)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Collect every transitive descendant reply of a node
///
/// Worklist traversal (breadth-first) rather than recursion, so pathological
/// thread depth costs iterations, not stack. Each round fetches the
/// children of the whole frontier in one query. A node deleted by a
/// concurrent actor is simply absent from the find.
pub async fn collect_descendant_replies(
    pool: &PgPool,
    root_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut collected: Vec<Uuid> = Vec::new();
    let mut frontier: Vec<Uuid> = vec![root_id];

    while !frontier.is_empty() {
        let children: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM comment_replies
            WHERE parent_id = ANY($1)
            "#,
        )
        .bind(&frontier)
        .fetch_all(pool)
        .await?;

        collected.extend(&children);
        frontier = children;
    }

    Ok(collected)
}

/// Delete a batch of replies by id
pub async fn delete_replies_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        DELETE FROM comment_replies
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete a comment, scoped to its author
pub async fn delete_comment_scoped(
    pool: &PgPool,
    comment_id: Uuid,
    author_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM comments
        WHERE id = $1 AND author_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(author_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete a reply, scoped to its author
pub async fn delete_reply_scoped(
    pool: &PgPool,
    reply_id: Uuid,
    author_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM comment_replies
        WHERE id = $1 AND author_id = $2
        "#,
    )
    .bind(reply_id)
    .bind(author_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
