//! API integration tests
//!
//! End-to-end scenarios through the router: comment creation with
//! notification fan-out, the 404-shaped authorization response, cascade
//! deletes over HTTP, and toggle semantics. Requires a PostgreSQL instance
//! at DATABASE_URL.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::database::TestDatabase;
use common::fixtures::{bearer_token, count_rows, create_test_post, create_test_user};
use serial_test::serial;
use tower::ServiceExt;
use uuid::Uuid;

use artgram::realtime::NotificationRegistry;
use artgram::server::init::create_app_with;

fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[serial]
async fn commenting_on_anothers_post_notifies_the_owner() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let u1 = create_test_user(pool, "ansel").await;
    let u2 = create_test_user(pool, "bea").await;
    let p1 = create_test_post(pool, u2).await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/post/{}/comments", p1),
            &bearer_token(u1, "ansel"),
            serde_json::json!({ "message": "hello" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["authorId"], u1.to_string());
    assert_eq!(body["postId"], p1.to_string());
    assert_eq!(body["message"], "hello");
    assert_eq!(body["author"]["username"], "ansel");

    let receiver: Uuid =
        sqlx::query_scalar("SELECT receiver_id FROM notifications WHERE notification_type = 'comment'")
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(receiver, u2);
}

#[tokio::test]
#[serial]
async fn a_blank_comment_is_rejected() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let u1 = create_test_user(pool, "ansel").await;
    let p1 = create_test_post(pool, u1).await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/post/{}/comments", p1),
            &bearer_token(u1, "ansel"),
            serde_json::json!({ "message": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn commenting_on_a_missing_post_is_404() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let u1 = create_test_user(pool, "ansel").await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/post/{}/comments", Uuid::new_v4()),
            &bearer_token(u1, "ansel"),
            serde_json::json!({ "message": "hello" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn editing_someone_elses_comment_is_404_shaped_not_403() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let author = create_test_user(pool, "ansel").await;
    let stranger = create_test_user(pool, "bea").await;
    let post = create_test_post(pool, author).await;
    let comment = artgram::comments::db::create_comment(pool, post, author, "mine")
        .await
        .unwrap();

    let response = app
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/v1/post/comments/{}", comment.id),
            &bearer_token(stranger, "bea"),
            serde_json::json!({ "content": "hijacked" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Comment not found or not authorized");
}

#[tokio::test]
#[serial]
async fn missing_credential_is_403() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn unknown_route_is_404() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/no/such/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn liking_a_comment_succeeds_and_notifies_its_author() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let ansel = create_test_user(pool, "ansel").await;
    let bea = create_test_user(pool, "bea").await;
    let post = create_test_post(pool, bea).await;
    let comment = artgram::comments::db::create_comment(pool, post, bea, "nice shot")
        .await
        .unwrap();

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/post/likes/comment/{}", comment.id),
            &bearer_token(ansel, "ansel"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["liked"], true);

    let (receiver, notification_type): (Uuid, String) =
        sqlx::query_as("SELECT receiver_id, notification_type FROM notifications")
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(receiver, bea);
    assert_eq!(notification_type, "like");
}

#[tokio::test]
#[serial]
async fn realtime_handshake_without_token_is_403() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/realtime")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn replying_to_own_comment_with_a_mention_notifies_only_the_mentioned_user() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let ansel = create_test_user(pool, "ansel").await;
    let bea = create_test_user(pool, "bea").await;
    let post = create_test_post(pool, ansel).await;
    let comment = artgram::comments::db::create_comment(pool, post, ansel, "my own post")
        .await
        .unwrap();

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/post/reply/{}", comment.id),
            &bearer_token(ansel, "ansel"),
            serde_json::json!({ "message": "look at this @bea" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    // No reply notification (self), no owner notification (self): exactly
    // one mention notification to bea.
    assert_eq!(count_rows(pool, "notifications").await, 1);
    let (receiver, notification_type): (Uuid, String) =
        sqlx::query_as("SELECT receiver_id, notification_type FROM notifications")
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(receiver, bea);
    assert_eq!(notification_type, "mention");
}

#[tokio::test]
#[serial]
async fn deleting_a_comment_with_nested_replies_removes_three_rows() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let ansel = create_test_user(pool, "ansel").await;
    let post = create_test_post(pool, ansel).await;
    let comment = artgram::comments::db::create_comment(pool, post, ansel, "root")
        .await
        .unwrap();
    let reply = artgram::comments::db::create_reply(pool, comment.id, ansel, "@ansel one")
        .await
        .unwrap();
    artgram::comments::db::create_reply(pool, reply.id, ansel, "@ansel two")
        .await
        .unwrap();

    let response = app
        .oneshot(authed_json_request(
            "DELETE",
            &format!("/api/v1/post/comments/{}", comment.id),
            &bearer_token(ansel, "ansel"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["deletedReplies"], 2);

    assert_eq!(count_rows(pool, "comments").await, 0);
    assert_eq!(count_rows(pool, "comment_replies").await, 0);
}

#[tokio::test]
#[serial]
async fn follow_toggle_round_trip() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let ansel = create_test_user(pool, "ansel").await;
    let bea = create_test_user(pool, "bea").await;
    let token = bearer_token(ansel, "ansel");

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/user/follow/{}", bea),
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["operation"], "follow");

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/user/follow/{}", bea),
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["operation"], "unfollow");

    assert_eq!(count_rows(pool, "followings").await, 0);
    assert_eq!(count_rows(pool, "followers").await, 0);
}

#[tokio::test]
#[serial]
async fn following_a_missing_user_is_400() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let ansel = create_test_user(pool, "ansel").await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/user/follow/{}", Uuid::new_v4()),
            &bearer_token(ansel, "ansel"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn like_toggle_round_trip_over_http() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let app = create_app_with(pool.clone(), NotificationRegistry::new());

    let ansel = create_test_user(pool, "ansel").await;
    let bea = create_test_user(pool, "bea").await;
    let post = create_test_post(pool, bea).await;
    let token = bearer_token(ansel, "ansel");

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/post/likes/post/{}", post),
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["liked"], true);

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/v1/post/likes/post/{}", post),
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["liked"], false);

    assert_eq!(count_rows(pool, "post_likes").await, 0);
    // Only the initial like notified the owner
    assert_eq!(count_rows(pool, "notifications").await, 1);
}
