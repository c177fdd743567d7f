/**
 * Notification Subscription Handler
 *
 * Server-Sent Events endpoint for the realtime channel. The client supplies
 * its signed credential as a handshake query parameter:
 *
 * ```http
 * GET /realtime?token=<jwt> HTTP/1.1
 * ```
 *
 * The connection is refused with 403 before joining any room when the
 * credential is missing or invalid. On success the connection joins the room
 * named by the authenticated user's id and receives `notification` events
 * with the persisted JSON shape:
 *
 * ```http
 * event: notification
 * data: {"id":"...","senderId":"...","receiverId":"...","notificationType":"comment",...}
 * ```
 *
 * Disconnection drops the room membership; there is no persistence side
 * effect.
 */

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::sse::{Event, Sse},
};
use futures_util::stream;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::error::ApiError;
use crate::realtime::registry::NotificationRegistry;

/// Prunes the subscriber's room when the SSE stream is dropped
struct RoomGuard {
    registry: NotificationRegistry,
    user_id: Uuid,
}

impl Drop for RoomGuard {
    fn drop(&mut self) {
        tracing::debug!("Realtime connection closed for user {}", self.user_id);
        self.registry.prune_idle_rooms();
    }
}

/// Handle notification subscription (GET /realtime)
///
/// # Errors
///
/// * `403 Forbidden` - missing or invalid `token` query parameter, or the
///   registry has been shut down
pub async fn handle_notification_subscription(
    State(registry): State<NotificationRegistry>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let token = params.get("token").ok_or_else(|| {
        tracing::warn!("Realtime handshake without token");
        ApiError::Unauthenticated
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Realtime handshake with invalid token: {:?}", e);
        ApiError::Unauthenticated
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthenticated)?;

    let rx = registry.subscribe(user_id).map_err(|e| {
        tracing::error!("Realtime subscribe failed: {}", e);
        ApiError::Unauthenticated
    })?;

    tracing::info!("Realtime connection joined room {}", user_id);

    let guard = RoomGuard {
        registry: registry.clone(),
        user_id,
    };

    // Stream events from the room until the client disconnects. Axum's
    // keep-alive mechanism injects comment lines to hold the connection
    // open between events.
    let stream = stream::unfold((rx, guard), move |(mut rx, guard)| async move {
        loop {
            match rx.recv().await {
                Ok(notification) => {
                    let data = match serde_json::to_string(&notification) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("Failed to serialize notification: {:?}", e);
                            continue;
                        }
                    };

                    let event = Event::default().event("notification").data(data);
                    return Some((Ok(event), (rx, guard)));
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    // Slow client; skipped pushes are still persisted rows
                    tracing::warn!("Realtime receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Room channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default()))
}
