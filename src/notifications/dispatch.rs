/**
 * Notification Dispatcher
 *
 * Builds notification records for comment, reply, mention, like and follow
 * events, persists them, and pushes them to the receiver's realtime room.
 *
 * # Ordering and failure
 *
 * The triggering mutation is already persisted before `notify` runs. The
 * push is fire-and-forget: an offline receiver or a shut-down registry is
 * logged and swallowed, never failing the parent mutation. When one
 * mutation fans out to several receivers (mentions plus the post owner),
 * each receiver's persist+push is attempted independently.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::realtime::registry::NotificationRegistry;

use super::{db, Notification, NotificationData, NotificationType};

/// Everything needed to create one notification
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub data: NotificationData,
}

impl NewNotification {
    pub fn new(
        sender_id: Uuid,
        receiver_id: Uuid,
        notification_type: NotificationType,
        data: NotificationData,
    ) -> Self {
        Self {
            sender_id,
            receiver_id,
            notification_type,
            post_id: None,
            data,
        }
    }

    pub fn with_post(mut self, post_id: Uuid) -> Self {
        self.post_id = Some(post_id);
        self
    }
}

/// Persist a notification and push it to the receiver's room
///
/// A self-notification (`sender == receiver`) is a silent no-op returning
/// `Ok(None)`. Persistence errors propagate to the caller; push failures do
/// not.
pub async fn notify(
    pool: &PgPool,
    registry: &NotificationRegistry,
    new: NewNotification,
) -> Result<Option<Notification>, sqlx::Error> {
    if new.sender_id == new.receiver_id {
        tracing::debug!("Skipping self-notification for user {}", new.sender_id);
        return Ok(None);
    }

    let notification = db::create_notification(
        pool,
        new.sender_id,
        new.receiver_id,
        new.notification_type,
        new.post_id,
        &new.data,
    )
    .await?;

    push(registry, &notification);

    Ok(Some(notification))
}

/// Fire-and-forget push to the receiver's room
fn push(registry: &NotificationRegistry, notification: &Notification) {
    match registry.send(notification.receiver_id, notification.clone()) {
        Ok(0) => {
            tracing::debug!(
                "Receiver {} not connected, notification {} persisted only",
                notification.receiver_id,
                notification.id
            );
        }
        Ok(count) => {
            tracing::info!(
                "Notification {} pushed to {} connection(s) of user {}",
                notification.id,
                count,
                notification.receiver_id
            );
        }
        Err(e) => {
            tracing::error!("Notification push failed: {}", e);
        }
    }
}

/// Payload for a comment on someone's post
pub fn comment_payload(
    sender_username: &str,
    sender_avatar: Option<&str>,
    post_image: Option<&str>,
    message: &str,
) -> NotificationData {
    NotificationData {
        message: format!("{} commented on your post: {}", sender_username, message),
        avatar: sender_avatar.map(|s| s.to_string()),
        image: post_image.map(|s| s.to_string()),
    }
}

/// Payload for a mention inside a comment or reply
pub fn mention_payload(
    sender_username: &str,
    sender_avatar: Option<&str>,
    post_image: Option<&str>,
    message: &str,
) -> NotificationData {
    NotificationData {
        message: format!("{} mentioned you in a comment: {}", sender_username, message),
        avatar: sender_avatar.map(|s| s.to_string()),
        image: post_image.map(|s| s.to_string()),
    }
}

/// Payload for a reply to a comment or reply
pub fn reply_payload(
    sender_username: &str,
    sender_avatar: Option<&str>,
    post_image: Option<&str>,
    reply_content: &str,
) -> NotificationData {
    NotificationData {
        message: format!("{} replied: {}", sender_username, reply_content),
        avatar: sender_avatar.map(|s| s.to_string()),
        image: post_image.map(|s| s.to_string()),
    }
}

/// Payload for a like on a post, comment or reply
pub fn like_payload(
    sender_username: &str,
    sender_avatar: Option<&str>,
    target_image: Option<&str>,
    target_description: &str,
) -> NotificationData {
    NotificationData {
        message: format!("{} liked {}", sender_username, target_description),
        avatar: sender_avatar.map(|s| s.to_string()),
        image: target_image.map(|s| s.to_string()),
    }
}

/// Payload for a new follower
pub fn follow_payload(sender_username: &str, sender_avatar: Option<&str>) -> NotificationData {
    NotificationData {
        message: format!("{} has started following you.", sender_username),
        avatar: sender_avatar.map(|s| s.to_string()),
        image: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_payload_message() {
        let data = comment_payload("ansel", Some("a.png"), Some("img.png"), "nice shot");
        assert_eq!(data.message, "ansel commented on your post: nice shot");
        assert_eq!(data.avatar.as_deref(), Some("a.png"));
        assert_eq!(data.image.as_deref(), Some("img.png"));
    }

    #[test]
    fn test_follow_payload_has_no_image() {
        let data = follow_payload("bea", None);
        assert_eq!(data.message, "bea has started following you.");
        assert!(data.image.is_none());
    }
}
