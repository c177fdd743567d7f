/**
 * API Route Configuration
 *
 * Versioned API surface under `/api/v1`, all behind the bearer-token
 * middleware.
 *
 * # Routes
 *
 * ## Comments and replies
 * - `POST /api/v1/post/{post_id}/comments` - create comment
 * - `PUT /api/v1/post/comments/{comment_id}` - edit own comment
 * - `DELETE /api/v1/post/comments/{comment_id}` - delete comment + descendants
 * - `POST /api/v1/post/reply/{parent_id}` - reply to a comment or reply
 * - `DELETE /api/v1/post/replies/{reply_id}` - delete reply + nested replies
 *
 * ## Likes
 * - `POST /api/v1/post/likes/comment/{comment_id}` - toggle like
 * - `POST /api/v1/post/likes/post/{post_id}` - toggle like
 * - `POST /api/v1/post/likes/reply/{reply_id}` - toggle like
 *
 * ## Follows
 * - `POST /api/v1/user/follow/{id}` - toggle follow
 *
 * ## Notifications
 * - `GET /api/v1/notifications` - list own notifications
 * - `PATCH /api/v1/notifications/{id}/read` - mark one as read
 */

use axum::Router;

use crate::comments::handlers as comments;
use crate::follows::handlers as follows;
use crate::likes::handlers as likes;
use crate::middleware::auth::auth_middleware;
use crate::notifications::handlers as notifications;
use crate::server::state::AppState;

/// Configure the authenticated API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let api = Router::new()
        // Comment tree endpoints
        .route(
            "/post/{post_id}/comments",
            axum::routing::post(comments::create_comment),
        )
        .route(
            "/post/comments/{comment_id}",
            axum::routing::put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route(
            "/post/reply/{parent_id}",
            axum::routing::post(comments::create_reply),
        )
        .route(
            "/post/replies/{reply_id}",
            axum::routing::delete(comments::delete_reply),
        )
        // Like endpoints
        .route(
            "/post/likes/comment/{comment_id}",
            axum::routing::post(likes::toggle_comment_like),
        )
        .route(
            "/post/likes/post/{post_id}",
            axum::routing::post(likes::toggle_post_like),
        )
        .route(
            "/post/likes/reply/{reply_id}",
            axum::routing::post(likes::toggle_reply_like),
        )
        // Follow endpoint
        .route(
            "/user/follow/{id}",
            axum::routing::post(follows::toggle_follow),
        )
        // Notification read-side
        .route(
            "/notifications",
            axum::routing::get(notifications::list_notifications),
        )
        .route(
            "/notifications/{id}/read",
            axum::routing::patch(notifications::mark_read),
        )
        .route_layer(axum::middleware::from_fn(auth_middleware));

    router.nest("/api/v1", api)
}
