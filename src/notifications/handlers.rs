//! Notification HTTP handlers
//!
//! Read-side endpoints: listing the actor's notifications and flipping the
//! read flag. Creation happens only through the dispatcher.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

use super::{db, Notification};

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
}

/// List the actor's notifications, newest first (GET /notifications)
pub async fn list_notifications(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let notifications = db::get_notifications_for_user(&pool, actor.user_id).await?;
    Ok(Json(NotificationListResponse { notifications }))
}

/// Mark one of the actor's notifications as read (PATCH /notifications/{id}/read)
///
/// Scoped to the receiver: a notification that does not exist or belongs to
/// someone else yields the uniform 404 shape.
pub async fn mark_read(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = db::mark_notification_read(&pool, notification_id, actor.user_id).await?;

    if affected == 0 {
        return Err(ApiError::not_found("Notification not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Notification marked as read" })))
}
