/**
 * Like HTTP Handlers
 *
 * Toggle endpoints for comment, post and reply likes. A freshly created
 * like notifies the target's owner: the comment's author, the post's
 * owner, and the reply's author respectively. Unliking dispatches nothing.
 */

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::users;
use crate::comments::db as comments_db;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::notifications::dispatch::{self, NewNotification};
use crate::notifications::NotificationType;
use crate::server::state::AppState;

use super::db;

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub success: bool,
    pub liked: bool,
    pub message: String,
}

/// Best-effort actor lookup for the notification payload
///
/// The toggle is already committed when this runs, so a lookup failure is
/// logged and the notification skipped rather than failing the response.
async fn like_actor(state: &AppState, user_id: Uuid) -> Option<crate::auth::users::UserStub> {
    match users::get_user_stub(&state.db_pool, user_id).await {
        Ok(Some(actor)) => Some(actor),
        Ok(None) => {
            tracing::warn!("Like actor {} has no user row, skipping notification", user_id);
            None
        }
        Err(e) => {
            tracing::error!("Like actor lookup failed, skipping notification: {:?}", e);
            None
        }
    }
}

/// Persist-and-push a like notification, best-effort
async fn notify_like(
    state: &AppState,
    sender_id: Uuid,
    receiver_id: Uuid,
    post_id: Option<Uuid>,
    data: crate::notifications::NotificationData,
) {
    let mut new = NewNotification::new(sender_id, receiver_id, NotificationType::Like, data);
    if let Some(post_id) = post_id {
        new = new.with_post(post_id);
    }
    if let Err(e) = dispatch::notify(&state.db_pool, &state.registry, new).await {
        tracing::error!("Like notification failed: {:?}", e);
    }
}

/// Toggle a like on a comment (POST /post/likes/comment/{comment_id})
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    let target = db::get_comment_like_target(&state.db_pool, comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    let liked = db::toggle_comment_like(&state.db_pool, comment_id, auth.user_id).await?;

    if liked {
        if let Some(actor) = like_actor(&state, auth.user_id).await {
            let data = dispatch::like_payload(
                &actor.username,
                actor.avatar.as_deref(),
                target.post_image.as_deref(),
                &format!("your comment: {}", target.message),
            );
            notify_like(&state, actor.id, target.author_id, Some(target.post_id), data).await;
        }
    }

    Ok(Json(ToggleLikeResponse {
        success: true,
        liked,
        message: if liked { "Comment liked" } else { "Comment unliked" }.to_string(),
    }))
}

/// Toggle a like on a post (POST /post/likes/post/{post_id})
///
/// The notification goes to the post owner.
pub async fn toggle_post_like(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    let post = comments_db::get_post_meta(&state.db_pool, post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found."))?;

    let liked = db::toggle_post_like(&state.db_pool, post_id, auth.user_id).await?;

    if liked {
        if let Some(actor) = like_actor(&state, auth.user_id).await {
            let data = dispatch::like_payload(
                &actor.username,
                actor.avatar.as_deref(),
                post.image.as_deref(),
                "your post",
            );
            notify_like(&state, actor.id, post.user_id, Some(post.id), data).await;
        }
    }

    Ok(Json(ToggleLikeResponse {
        success: true,
        liked,
        message: if liked { "Post liked" } else { "Post unliked" }.to_string(),
    }))
}

/// Toggle a like on a reply (POST /post/likes/reply/{reply_id})
///
/// The notification goes to the reply's author; the image context comes
/// from the post the reply's ancestor comment sits on.
pub async fn toggle_reply_like(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(reply_id): Path<Uuid>,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    let reply = comments_db::get_reply(&state.db_pool, reply_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Reply not found"))?;

    let liked = db::toggle_reply_like(&state.db_pool, reply_id, auth.user_id).await?;

    if liked {
        if let Some(actor) = like_actor(&state, auth.user_id).await {
            // Best-effort context: a dangling ancestor chain just means no
            // image in the payload.
            let post = match comments_db::resolve_ancestor_comment(&state.db_pool, &reply).await {
                Ok(Some(ancestor)) => {
                    comments_db::get_post_meta(&state.db_pool, ancestor.post_id)
                        .await
                        .unwrap_or(None)
                }
                _ => None,
            };

            let data = dispatch::like_payload(
                &actor.username,
                actor.avatar.as_deref(),
                post.as_ref().and_then(|p| p.image.as_deref()),
                "your reply",
            );
            notify_like(
                &state,
                actor.id,
                reply.author_id,
                post.as_ref().map(|p| p.id),
                data,
            )
            .await;
        }
    }

    Ok(Json(ToggleLikeResponse {
        success: true,
        liked,
        message: if liked { "Reply liked" } else { "Reply unliked" }.to_string(),
    }))
}
