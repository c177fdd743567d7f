/**
 * Application State Management
 *
 * `AppState` is the central state container, cloned into every handler.
 * The notification registry is injected here rather than reached through a
 * global, so its lifecycle (creation at startup, shutdown at exit) stays
 * explicit and testable.
 *
 * # Thread Safety
 *
 * - `PgPool` is internally reference-counted and thread-safe
 * - `NotificationRegistry` guards its room map with a mutex
 *
 * PostgreSQL is the system of record; nothing about comments, replies or
 * notifications is cached in process.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::realtime::registry::NotificationRegistry;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// Per-user realtime notification rooms
    pub registry: NotificationRegistry,
}

impl AppState {
    pub fn new(db_pool: PgPool, registry: NotificationRegistry) -> Self {
        Self { db_pool, registry }
    }
}

/// Allow handlers to extract the pool directly
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Allow handlers to extract the registry directly
impl FromRef<AppState> for NotificationRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}
