/**
 * Router Configuration
 *
 * Combines the realtime subscription endpoint and the versioned API routes
 * into the application router.
 *
 * # Route Order
 *
 * 1. `/realtime` - SSE subscription (authenticates via handshake query
 *    parameter, so it sits outside the bearer-token middleware)
 * 2. `/api/v1/...` - authenticated API routes
 * 3. Fallback handler (404)
 */

use axum::Router;

use crate::realtime::subscription::handle_notification_subscription;
use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route(
        "/realtime",
        axum::routing::get(handle_notification_subscription),
    );

    // Add authenticated API routes
    let router = configure_api_routes(router);

    // Fallback handler for 404
    let router = router.fallback(|| async {
        (axum::http::StatusCode::NOT_FOUND, "404 Not Found")
    });

    router.with_state(app_state)
}
