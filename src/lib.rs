//! Artgram Backend
//!
//! Server-side core of the artgram social application: nested comment/reply
//! trees, mention resolution, notification dispatch, and a realtime channel
//! registry that pushes notifications to connected clients.
//!
//! # Architecture
//!
//! The crate is organized into focused modules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`comments`** - Comment and reply tree management (create/update/cascade delete)
//! - **`mentions`** - `@username` parsing and resolution
//! - **`notifications`** - Notification persistence and dispatch
//! - **`realtime`** - Per-user notification rooms and the SSE subscription endpoint
//! - **`likes`** - Toggle-likes on posts, comments and replies
//! - **`follows`** - Mirrored follow/unfollow edges
//! - **`auth`** - JWT verification and user lookups
//! - **`middleware`** - Request authentication middleware
//! - **`error`** - API error taxonomy
//!
//! # State Management
//!
//! `AppState` holds the PostgreSQL pool and the `NotificationRegistry`. The
//! registry's room map is the only in-process shared mutable state; PostgreSQL
//! is the system of record for everything else.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Comment and reply tree management
pub mod comments;

/// Mention parsing and resolution
pub mod mentions;

/// Notification persistence and dispatch
pub mod notifications;

/// Realtime notification rooms
pub mod realtime;

/// Toggle-likes
pub mod likes;

/// Follow/unfollow edges
pub mod follows;

/// JWT sessions and user lookups
pub mod auth;

/// Request middleware
pub mod middleware;

/// API error types
pub mod error;

// Re-export commonly used types
pub use error::ApiError;
pub use realtime::registry::NotificationRegistry;
pub use server::create_app;
pub use server::state::AppState;
