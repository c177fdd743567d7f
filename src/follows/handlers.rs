/**
 * Follow HTTP Handlers
 *
 * One toggle endpoint: following when not following, unfollowing when
 * already following. A missing target is a validation error (400), matching
 * the rest of the follow surface rather than the 404 shape.
 */

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::users;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::notifications::dispatch::{self, NewNotification};
use crate::notifications::NotificationType;
use crate::server::state::AppState;

use super::db;

#[derive(Debug, Serialize)]
pub struct ToggleFollowResponse {
    pub success: bool,
    pub operation: String,
}

/// Toggle following a user (POST /user/follow/{id})
pub async fn toggle_follow(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<ToggleFollowResponse>, ApiError> {
    let target = users::get_user_by_id(&state.db_pool, target_id)
        .await?
        .ok_or_else(|| ApiError::validation("User not found."))?;

    if db::is_following(&state.db_pool, auth.user_id, target.id).await? {
        db::delete_follow_edges(&state.db_pool, auth.user_id, target.id).await?;

        return Ok(Json(ToggleFollowResponse {
            success: true,
            operation: "unfollow".to_string(),
        }));
    }

    db::create_follow_edges(&state.db_pool, auth.user_id, target.id).await?;

    if let Some(actor) = users::get_user_stub(&state.db_pool, auth.user_id).await? {
        let data = dispatch::follow_payload(&actor.username, actor.avatar.as_deref());
        let new = NewNotification::new(actor.id, target.id, NotificationType::Follow, data);
        if let Err(e) = dispatch::notify(&state.db_pool, &state.registry, new).await {
            tracing::error!("Follow notification failed: {:?}", e);
        }
    }

    Ok(Json(ToggleFollowResponse {
        success: true,
        operation: "follow".to_string(),
    }))
}
