/**
 * Server Initialization
 *
 * Builds the Axum application: database pool, notification registry,
 * router and middleware. The registry handle is returned alongside the
 * router so the process owner can shut the rooms down explicitly.
 */

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::realtime::registry::NotificationRegistry;
use crate::routes::router::create_router;
use crate::server::config::{load_database, ConfigError};
use crate::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app() -> Result<(Router, NotificationRegistry), ConfigError> {
    let db_pool = load_database().await?;

    let registry = NotificationRegistry::new();

    let app_state = AppState::new(db_pool, registry.clone());

    let app = create_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok((app, registry))
}

/// Build the application against an existing pool and registry
///
/// Used by tests that manage their own database fixture.
pub fn create_app_with(db_pool: sqlx::PgPool, registry: NotificationRegistry) -> Router {
    let app_state = AppState::new(db_pool, registry);
    create_router(app_state).layer(TraceLayer::new_for_http())
}
