/**
 * Notification Room Registry
 *
 * Maintains live notification channels keyed by user identity. Each user id
 * addresses one room; a room is a `tokio::sync::broadcast` channel, so a
 * user connected from several devices is simply several subscribers of the
 * same sender.
 *
 * The registry is a cloneable handle owned by `AppState` and passed
 * explicitly to whoever needs to push (no global singleton). `shutdown`
 * tears the rooms down; pushes after shutdown fail with a distinct error
 * that callers log and swallow.
 *
 * # Locking
 *
 * The room map is guarded by a `std::sync::Mutex` held only for map
 * operations, never across an await point.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::notifications::Notification;

/// Capacity of each per-user room channel
const ROOM_CHANNEL_CAPACITY: usize = 100;

/// Registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry has been shut down; no rooms exist anymore
    #[error("notification registry is shut down")]
    Closed,
}

struct Rooms {
    channels: HashMap<Uuid, broadcast::Sender<Notification>>,
    open: bool,
}

/// Per-user notification rooms
///
/// # Usage
///
/// ```rust
/// use artgram::realtime::NotificationRegistry;
///
/// let registry = NotificationRegistry::new();
/// let user_id = uuid::Uuid::new_v4();
/// let _rx = registry.subscribe(user_id).unwrap();
/// ```
#[derive(Clone)]
pub struct NotificationRegistry {
    rooms: Arc<Mutex<Rooms>>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(Rooms {
                channels: HashMap::new(),
                open: true,
            })),
        }
    }

    /// Join the room for a user, creating it lazily
    ///
    /// The returned receiver is the caller's membership; dropping it leaves
    /// the room.
    pub fn subscribe(&self, user_id: Uuid) -> Result<broadcast::Receiver<Notification>, RegistryError> {
        let mut rooms = self.rooms.lock().expect("registry lock poisoned");
        if !rooms.open {
            return Err(RegistryError::Closed);
        }
        let sender = rooms
            .channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0);
        Ok(sender.subscribe())
    }

    /// Push a notification to every live connection in a user's room
    ///
    /// Fire-and-forget: returns the number of connections that received the
    /// push, `Ok(0)` when the user has no live connections.
    pub fn send(&self, user_id: Uuid, notification: Notification) -> Result<usize, RegistryError> {
        let rooms = self.rooms.lock().expect("registry lock poisoned");
        if !rooms.open {
            return Err(RegistryError::Closed);
        }
        match rooms.channels.get(&user_id) {
            Some(sender) => Ok(sender.send(notification).unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Number of live connections in a user's room
    pub fn connection_count(&self, user_id: Uuid) -> usize {
        let rooms = self.rooms.lock().expect("registry lock poisoned");
        rooms
            .channels
            .get(&user_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Drop rooms with no remaining connections
    ///
    /// Called when a subscriber disconnects so the map does not grow with
    /// every user that ever connected.
    pub fn prune_idle_rooms(&self) {
        let mut rooms = self.rooms.lock().expect("registry lock poisoned");
        rooms.channels.retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Tear down every room and refuse further pushes
    pub fn shutdown(&self) {
        let mut rooms = self.rooms.lock().expect("registry lock poisoned");
        rooms.open = false;
        rooms.channels.clear();
        tracing::info!("Notification registry shut down");
    }
}

impl Default for NotificationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
