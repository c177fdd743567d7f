//! Realtime notification delivery
//!
//! A per-user room registry and the SSE subscription endpoint that delivers
//! notification pushes to connected clients. Delivery is best-effort: the
//! notification row is already persisted by the dispatcher, so an offline
//! client simply sees it on its next fetch.

/// Room registry keyed by user identity
pub mod registry;

/// SSE subscription handler
pub mod subscription;

pub use registry::{NotificationRegistry, RegistryError};
pub use subscription::handle_notification_subscription;
