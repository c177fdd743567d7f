//! Notifications
//!
//! Notification records are created once by the dispatcher, pushed to the
//! receiver's realtime room, and never mutated afterwards except for the
//! read flag. They are deliberately not part of a transaction with the
//! mutation that triggered them: the comment/like/follow row is durably
//! persisted first, and notification creation is best-effort on top.

/// Database operations
pub mod db;

/// Dispatcher (persist + push)
pub mod dispatch;

/// HTTP handlers for reading notifications
pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use dispatch::{notify, NewNotification};

/// Notification type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Comment,
    Mention,
    Like,
    Follow,
    Reply,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Mention => "mention",
            Self::Like => "like",
            Self::Follow => "follow",
            Self::Reply => "reply",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "comment" => Some(Self::Comment),
            "mention" => Some(Self::Mention),
            "like" => Some(Self::Like),
            "follow" => Some(Self::Follow),
            "reply" => Some(Self::Reply),
            _ => None,
        }
    }
}

/// Free-form payload rendered by the client without a follow-up fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    /// Human-readable display message
    pub message: String,
    /// Sender avatar snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Target image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A persisted notification
///
/// The wire shape matches what the realtime channel emits, so the same JSON
/// serves both the REST listing and the SSE push.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub notification_type: NotificationType,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    pub notification_data: NotificationData,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_round_trip() {
        for ty in [
            NotificationType::Comment,
            NotificationType::Mention,
            NotificationType::Like,
            NotificationType::Follow,
            NotificationType::Reply,
        ] {
            assert_eq!(NotificationType::from_str(ty.as_str()), Some(ty));
        }
        assert_eq!(NotificationType::from_str("poke"), None);
    }

    #[test]
    fn test_notification_wire_shape_is_camel_case() {
        let n = Notification {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            notification_type: NotificationType::Mention,
            date: Utc::now(),
            post_id: Some(Uuid::new_v4()),
            notification_data: NotificationData {
                message: "ansel mentioned you in a comment: hi @bea".to_string(),
                avatar: Some("https://cdn.example/a.png".to_string()),
                image: None,
            },
            read: false,
        };

        let json = serde_json::to_value(&n).unwrap();
        assert!(json.get("senderId").is_some());
        assert!(json.get("receiverId").is_some());
        assert_eq!(json["notificationType"], "mention");
        assert!(json["notificationData"].get("image").is_none());
    }
}
