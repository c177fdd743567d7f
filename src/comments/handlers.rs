/**
 * Comment and Reply HTTP Handlers
 *
 * Mutation flow for every handler here: persist the comment/reply first,
 * then resolve mentions and dispatch notifications. The mutation is durable
 * before any notification exists, and every notification persist+push is
 * best-effort per recipient - a failure is logged and never fails the
 * response.
 *
 * "Not found" and "not authorized" are collapsed into one 404 response so
 * the API does not leak row existence; which of the two occurred is logged.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::users::{self, UserStub};
use crate::error::ApiError;
use crate::mentions;
use crate::middleware::auth::AuthUser;
use crate::notifications::dispatch::{self, NewNotification};
use crate::notifications::NotificationType;
use crate::server::state::AppState;

use super::db::{self, Comment, ParentNode, PostMeta, Reply};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReplyRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: UserStub,
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    #[serde(flatten)]
    pub reply: Reply,
    pub author: UserStub,
}

/// Look up the acting user's stub; a valid token for a deleted user is
/// treated as an invalid credential.
async fn actor_stub(pool: &sqlx::PgPool, user_id: Uuid) -> Result<UserStub, ApiError> {
    users::get_user_stub(pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for nonexistent user {}", user_id);
            ApiError::Unauthenticated
        })
}

/// Dispatch mention notifications for `text`, one per resolved user
///
/// Each recipient is independent: a persist or push failure for one is
/// logged and the rest still get theirs.
async fn fan_out_mentions(
    state: &AppState,
    actor: &UserStub,
    post: &PostMeta,
    text: &str,
    excluded_username: Option<&str>,
) {
    let mentioned = match mentions::resolve_mentions(
        &state.db_pool,
        text,
        &actor.username,
        excluded_username,
    )
    .await
    {
        Ok(mentioned) => mentioned,
        Err(e) => {
            tracing::error!("Mention resolution failed: {:?}", e);
            return;
        }
    };

    for user in mentioned {
        let data = dispatch::mention_payload(
            &actor.username,
            actor.avatar.as_deref(),
            post.image.as_deref(),
            text,
        );
        let new = NewNotification::new(actor.id, user.id, NotificationType::Mention, data)
            .with_post(post.id);

        if let Err(e) = dispatch::notify(&state.db_pool, &state.registry, new).await {
            tracing::error!("Mention notification for {} failed: {:?}", user.username, e);
        }
    }
}

/// Create a comment on a post (POST /post/{post_id}/comments)
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::validation(
            "Please provide a message with your comment.",
        ));
    }

    let post = db::get_post_meta(&state.db_pool, post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found."))?;

    let actor = actor_stub(&state.db_pool, auth.user_id).await?;

    // The comment is durable before any notification is attempted.
    let comment = db::create_comment(&state.db_pool, post.id, actor.id, &request.message).await?;

    // The post owner is notified below, so mentions of the owner are
    // excluded to avoid a double notification for the same comment.
    let owner = users::get_user_stub(&state.db_pool, post.user_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Post owner lookup failed: {:?}", e);
            None
        });
    let owner_username = owner.as_ref().map(|o| o.username.as_str());

    fan_out_mentions(&state, &actor, &post, &request.message, owner_username).await;

    let data = dispatch::comment_payload(
        &actor.username,
        actor.avatar.as_deref(),
        post.image.as_deref(),
        &request.message,
    );
    let new = NewNotification::new(actor.id, post.user_id, NotificationType::Comment, data)
        .with_post(post.id);
    if let Err(e) = dispatch::notify(&state.db_pool, &state.registry, new).await {
        tracing::error!("Comment notification failed: {:?}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            comment,
            author: actor,
        }),
    ))
}

/// Edit the actor's own comment (PUT /post/comments/{comment_id})
pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(comment_id): Path<Uuid>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::validation("Please provide the updated content."));
    }

    let affected =
        db::update_comment_scoped(&state.db_pool, comment_id, auth.user_id, &request.content)
            .await?;

    if affected == 0 {
        // Uniform response either way; the probe is for the log only.
        match db::get_comment(&state.db_pool, comment_id).await {
            Ok(Some(_)) => {
                tracing::info!("Comment {} edit refused: actor is not the author", comment_id)
            }
            Ok(None) => tracing::info!("Comment {} edit refused: no such comment", comment_id),
            Err(e) => tracing::error!("Comment existence probe failed: {:?}", e),
        }
        return Err(ApiError::not_found("Comment not found or not authorized"));
    }

    let updated = db::get_comment(&state.db_pool, comment_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Comment updated successfully",
        "comment": updated,
    })))
}

/// Delete a comment and every transitive descendant reply
/// (DELETE /post/comments/{comment_id})
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let comment = match db::get_comment(&state.db_pool, comment_id).await? {
        Some(comment) => comment,
        None => {
            tracing::info!("Comment {} delete refused: no such comment", comment_id);
            return Err(ApiError::not_found("Comment not found or not authorized"));
        }
    };

    if comment.author_id != auth.user_id {
        tracing::info!("Comment {} delete refused: actor is not the author", comment_id);
        return Err(ApiError::not_found("Comment not found or not authorized"));
    }

    let descendants = db::collect_descendant_replies(&state.db_pool, comment_id).await?;
    let deleted_replies = db::delete_replies_by_ids(&state.db_pool, &descendants).await?;

    // Still scoped to the author so a concurrent delete cannot slip through.
    let affected = db::delete_comment_scoped(&state.db_pool, comment_id, auth.user_id).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Comment not found or not authorized"));
    }

    tracing::debug!(
        "Deleted comment {} and {} descendant replies",
        comment_id,
        deleted_replies
    );

    Ok(Json(serde_json::json!({
        "message": "Comment and all related replies deleted successfully",
        "deletedReplies": deleted_replies,
    })))
}

/// Reply to a comment or to another reply (POST /post/reply/{parent_id})
///
/// The stored parent is the literal target; the ancestor comment is
/// resolved by walking up the tree for notification context. The reply text
/// is prefixed with `@{parent_author}`.
pub async fn create_reply(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(parent_id): Path<Uuid>,
    Json(request): Json<CreateReplyRequest>,
) -> Result<(StatusCode, Json<ReplyResponse>), ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::validation("Please provide a message"));
    }

    let parent = db::get_parent_node(&state.db_pool, parent_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    let (parent_author_id, ancestor) = match &parent {
        ParentNode::Comment(comment) => (comment.author_id, comment.clone()),
        ParentNode::Reply(reply) => {
            let ancestor = db::resolve_ancestor_comment(&state.db_pool, reply)
                .await?
                .ok_or_else(|| ApiError::not_found("Comment not found"))?;
            (reply.author_id, ancestor)
        }
    };

    let post = db::get_post_meta(&state.db_pool, ancestor.post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found."))?;

    let actor = actor_stub(&state.db_pool, auth.user_id).await?;
    let parent_author = users::get_user_stub(&state.db_pool, parent_author_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    let reply_content = format!("@{} {}", parent_author.username, request.message);

    let reply = db::create_reply(&state.db_pool, parent_id, actor.id, &reply_content).await?;

    // Parent author gets the reply notification; the dispatcher drops it
    // when the actor replies to themselves.
    let data = dispatch::reply_payload(
        &actor.username,
        actor.avatar.as_deref(),
        post.image.as_deref(),
        &reply_content,
    );
    let new = NewNotification::new(actor.id, parent_author.id, NotificationType::Reply, data)
        .with_post(post.id);
    if let Err(e) = dispatch::notify(&state.db_pool, &state.registry, new).await {
        tracing::error!("Reply notification failed: {:?}", e);
    }

    // Post owner gets a comment notification unless they already got the
    // reply one (they are the parent author) or they are the actor.
    if post.user_id != parent_author.id {
        let data = dispatch::comment_payload(
            &actor.username,
            actor.avatar.as_deref(),
            post.image.as_deref(),
            &request.message,
        );
        let new = NewNotification::new(actor.id, post.user_id, NotificationType::Comment, data)
            .with_post(post.id);
        if let Err(e) = dispatch::notify(&state.db_pool, &state.registry, new).await {
            tracing::error!("Post owner notification failed: {:?}", e);
        }
    }

    fan_out_mentions(
        &state,
        &actor,
        &post,
        &request.message,
        Some(parent_author.username.as_str()),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ReplyResponse {
            reply,
            author: actor,
        }),
    ))
}

/// Delete a reply and its nested subtree (DELETE /post/replies/{reply_id})
///
/// Ancestors are untouched; only the reply's own subtree is collected.
pub async fn delete_reply(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(reply_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reply = match db::get_reply(&state.db_pool, reply_id).await? {
        Some(reply) => reply,
        None => {
            tracing::info!("Reply {} delete refused: no such reply", reply_id);
            return Err(ApiError::not_found("Reply not found or not authorized"));
        }
    };

    if reply.author_id != auth.user_id {
        tracing::info!("Reply {} delete refused: actor is not the author", reply_id);
        return Err(ApiError::not_found("Reply not found or not authorized"));
    }

    let descendants = db::collect_descendant_replies(&state.db_pool, reply_id).await?;
    let deleted_replies = db::delete_replies_by_ids(&state.db_pool, &descendants).await?;

    let affected = db::delete_reply_scoped(&state.db_pool, reply_id, auth.user_id).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Reply not found or not authorized"));
    }

    tracing::debug!(
        "Deleted reply {} and {} nested replies",
        reply_id,
        deleted_replies
    );

    Ok(Json(serde_json::json!({
        "message": "Reply and all nested replies deleted successfully",
        "deletedReplies": deleted_replies,
    })))
}
