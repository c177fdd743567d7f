//! Database operations for notifications

use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool, Row};
use uuid::Uuid;

use super::{Notification, NotificationData, NotificationType};

fn row_to_notification(row: &sqlx::postgres::PgRow) -> Notification {
    let id: Uuid = row.get("id");
    let tag: String = row.get("notification_type");
    let notification_type = NotificationType::from_str(&tag).unwrap_or_else(|| {
        tracing::warn!(
            "Unrecognized notification_type '{}' on notification {}, treating as comment",
            tag,
            id
        );
        NotificationType::Comment
    });

    let data: Json<NotificationData> = row.get("notification_data");
    Notification {
        id,
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        notification_type,
        date: row.get("date"),
        post_id: row.get("post_id"),
        notification_data: data.0,
        read: row.get("read"),
    }
}

/// Persist a new notification (unread, current timestamp)
pub async fn create_notification(
    pool: &PgPool,
    sender_id: Uuid,
    receiver_id: Uuid,
    notification_type: NotificationType,
    post_id: Option<Uuid>,
    data: &NotificationData,
) -> Result<Notification, sqlx::Error> {
    let id = Uuid::new_v4();
    let now: DateTime<Utc> = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO notifications (id, sender_id, receiver_id, notification_type, date, post_id, notification_data, read)
        VALUES ($1, $2, $3, $4, $5, $6, $7, false)
        "#,
    )
    .bind(id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(notification_type.as_str())
    .bind(now)
    .bind(post_id)
    .bind(Json(data))
    .execute(pool)
    .await?;

    Ok(Notification {
        id,
        sender_id,
        receiver_id,
        notification_type,
        date: now,
        post_id,
        notification_data: data.clone(),
        read: false,
    })
}

/// Get notifications for a receiver, newest first
pub async fn get_notifications_for_user(
    pool: &PgPool,
    receiver_id: Uuid,
) -> Result<Vec<Notification>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, sender_id, receiver_id, notification_type, date, post_id, notification_data, read
        FROM notifications
        WHERE receiver_id = $1
        ORDER BY date DESC
        "#,
    )
    .bind(receiver_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_notification).collect())
}

/// Mark a notification as read, scoped to its receiver
///
/// Returns the number of rows affected; zero means the notification does
/// not exist or belongs to someone else.
pub async fn mark_notification_read(
    pool: &PgPool,
    notification_id: Uuid,
    receiver_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET read = true
        WHERE id = $1 AND receiver_id = $2
        "#,
    )
    .bind(notification_id)
    .bind(receiver_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
