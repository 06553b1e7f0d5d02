use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use parley_api::auth::{AppState, AppStateInner, issue_token};
use parley_api::router::router;
use parley_db::Database;

const SECRET: &str = "test-secret";

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    /// Router over an in-memory store seeded with three users.
    fn new() -> Self {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(
                "INSERT INTO users (id, username, tarkov_name) VALUES
                    (1, 'alice', 'Prapor'),
                    (2, 'bob', 'Skier'),
                    (3, 'carol', 'Mechanic');",
            )?;
            Ok(())
        })
        .unwrap();

        let state: AppState = Arc::new(AppStateInner {
            db,
            jwt_secret: SECRET.to_string(),
        });
        Self {
            app: router(state.clone()),
            state,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        user: Option<(i64, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, name)) = user {
            let token = issue_token(SECRET, id, name).unwrap();
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn count(&self, table: &str) -> i64 {
        self.state
            .db
            .with_conn(|conn| {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?)
            })
            .unwrap()
    }
}

const ALICE: Option<(i64, &str)> = Some((1, "alice"));
const BOB: Option<(i64, &str)> = Some((2, "bob"));
const CAROL: Option<(i64, &str)> = Some((3, "carol"));

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new();
    let (status, _) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unauthenticated_requests_are_forbidden_and_change_nothing() {
    let app = TestApp::new();

    let requests: Vec<(Method, &str, Option<Value>)> = vec![
        (Method::GET, "/messages", None),
        (Method::POST, "/messages", Some(json!({ "message": "sneaky" }))),
        (Method::PUT, "/messages/1", Some(json!({ "message": "sneaky" }))),
        (Method::DELETE, "/messages/1", None),
        (Method::GET, "/private-messages", None),
        (Method::GET, "/private-messages/2", None),
        (
            Method::POST,
            "/private-messages",
            Some(json!({ "message": "sneaky", "receiver_id": 2 })),
        ),
        (Method::PUT, "/private-messages/1", Some(json!({ "message": "sneaky" }))),
        (Method::DELETE, "/private-messages/1", None),
        (Method::GET, "/notifications", None),
        (Method::GET, "/notifications/unread-count", None),
        (
            Method::POST,
            "/notifications",
            Some(json!({ "from": "x", "receiver_id": 2, "message": "sneaky" })),
        ),
        (Method::PUT, "/notifications/1/read", None),
    ];

    for (method, uri, body) in requests {
        let (status, _) = app.call(method.clone(), uri, None, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }

    assert_eq!(app.count("messages"), 0);
    assert_eq!(app.count("private_messages"), 0);
    assert_eq!(app.count("notifications"), 0);
}

#[tokio::test]
async fn forged_token_is_forbidden() {
    let app = TestApp::new();
    let token = issue_token("someone-else", 1, "alice").unwrap();
    let request = Request::builder()
        .uri("/messages")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn global_post_shows_up_with_author_name() {
    let app = TestApp::new();

    let (status, _) = app
        .call(Method::POST, "/messages", ALICE, Some(json!({ "message": "hello" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.call(Method::GET, "/messages", BOB, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["description"], "hello");
    assert_eq!(rows[0]["user_id"], 1);
    assert_eq!(rows[0]["tarkov_name"], "Prapor");
    assert!(rows[0]["time"].as_str().unwrap().contains(" AM") || rows[0]["time"].as_str().unwrap().contains(" PM"));
}

#[tokio::test]
async fn global_listing_is_in_id_order() {
    let app = TestApp::new();
    for (user, text) in [(ALICE, "one"), (BOB, "two"), (ALICE, "three")] {
        app.call(Method::POST, "/messages", user, Some(json!({ "message": text })))
            .await;
    }

    let (_, body) = app.call(Method::GET, "/messages", CAROL, None).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn global_update_and_delete() {
    let app = TestApp::new();
    app.call(Method::POST, "/messages", ALICE, Some(json!({ "message": "draft" })))
        .await;
    let (_, body) = app.call(Method::GET, "/messages", ALICE, None).await;
    let id = body[0]["id"].as_i64().unwrap();

    // Any authenticated user may edit.
    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/messages/{}", id),
            BOB,
            Some(json!({ "message": "edited" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app.call(Method::GET, "/messages", ALICE, None).await;
    assert_eq!(body[0]["description"], "edited");

    let (status, _) = app
        .call(Method::DELETE, &format!("/messages/{}", id), ALICE, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .call(Method::DELETE, &format!("/messages/{}", id), ALICE, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(Method::PUT, "/messages/999", ALICE, Some(json!({ "message": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn private_message_appears_in_both_threads() {
    let app = TestApp::new();

    let (status, _) = app
        .call(
            Method::POST,
            "/private-messages",
            ALICE,
            Some(json!({ "message": "hi", "receiverId": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, as_bob) = app.call(Method::GET, "/private-messages/1", BOB, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = as_bob.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["message"], "hi");
    assert_eq!(entries[0]["sender_user_id"], 1);
    assert_eq!(entries[0]["receiver_user_id"], 2);
    assert_eq!(entries[0]["username"], "alice");

    let (_, as_alice) = app.call(Method::GET, "/private-messages/2", ALICE, None).await;
    assert_eq!(as_alice, as_bob);

    // Carol is not part of it.
    let (_, as_carol) = app.call(Method::GET, "/private-messages/1", CAROL, None).await;
    assert!(as_carol.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn inbox_lists_latest_entry_per_partner() {
    let app = TestApp::new();
    for (user, text) in [(BOB, "bob 1"), (CAROL, "carol 1"), (BOB, "bob 2")] {
        app.call(
            Method::POST,
            "/private-messages",
            user,
            Some(json!({ "message": text, "receiver_id": 1 })),
        )
        .await;
    }

    let (status, body) = app.call(Method::GET, "/private-messages", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Vec<(&str, &str)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["username"].as_str().unwrap(), e["message"].as_str().unwrap()))
        .collect();
    assert_eq!(summary, vec![("bob", "bob 2"), ("carol", "carol 1")]);
}

#[tokio::test]
async fn private_message_to_unknown_user_fails_cleanly() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            Method::POST,
            "/private-messages",
            ALICE,
            Some(json!({ "message": "hello?", "receiver_id": 42 })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // No store detail leaks to the caller.
    assert_eq!(body, Value::Null);

    assert_eq!(app.count("private_messages"), 0);
    assert_eq!(app.count("user_private_messages"), 0);
    assert_eq!(app.count("notifications"), 0);
}

#[tokio::test]
async fn private_update_and_delete() {
    let app = TestApp::new();
    app.call(
        Method::POST,
        "/private-messages",
        ALICE,
        Some(json!({ "message": "typo", "receiver_id": 2 })),
    )
    .await;
    let (_, thread) = app.call(Method::GET, "/private-messages/2", ALICE, None).await;
    let id = thread[0]["id"].as_i64().unwrap();

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/private-messages/{}", id),
            ALICE,
            Some(json!({ "message": "fixed" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, thread) = app.call(Method::GET, "/private-messages/1", BOB, None).await;
    assert_eq!(thread[0]["message"], "fixed");

    let (status, _) = app
        .call(Method::DELETE, &format!("/private-messages/{}", id), ALICE, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, thread) = app.call(Method::GET, "/private-messages/1", BOB, None).await;
    assert!(thread.as_array().unwrap().is_empty());

    let (status, _) = app
        .call(Method::DELETE, &format!("/private-messages/{}", id), ALICE, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notification_read_flow() {
    let app = TestApp::new();

    let (status, _) = app
        .call(
            Method::POST,
            "/notifications",
            ALICE,
            Some(json!({ "from": "alice", "receiver_id": 2, "message": "raid at 8" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app.call(
        Method::POST,
        "/notifications",
        CAROL,
        Some(json!({ "from": "carol", "receiver_id": 2, "message": "bring ammo" })),
    )
    .await;

    let (_, count) = app.call(Method::GET, "/notifications/unread-count", BOB, None).await;
    assert_eq!(count["count"], 2);

    let (_, unread) = app.call(Method::GET, "/notifications", BOB, None).await;
    let unread = unread.as_array().unwrap();
    assert_eq!(unread.len(), 2);
    assert_eq!(unread[0]["from"], "alice");
    assert_eq!(unread[0]["unread"], true);
    assert_eq!(unread[0]["isRead"], 1);
    let first = unread[0]["id"].as_i64().unwrap();

    let (status, _) = app
        .call(Method::PUT, &format!("/notifications/{}/read", first), BOB, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, count) = app.call(Method::GET, "/notifications/unread-count", BOB, None).await;
    assert_eq!(count["count"], 1);
    let (_, unread) = app.call(Method::GET, "/notifications", BOB, None).await;
    assert!(
        unread
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["id"].as_i64() != Some(first))
    );

    let (status, _) = app
        .call(Method::PUT, "/notifications/999/read", BOB, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn private_message_notifies_receiver() {
    let app = TestApp::new();
    app.call(
        Method::POST,
        "/private-messages",
        ALICE,
        Some(json!({ "message": "hi", "receiver_id": 2 })),
    )
    .await;

    let (_, unread) = app.call(Method::GET, "/notifications", BOB, None).await;
    let unread = unread.as_array().unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0]["from"], "alice");
    assert_eq!(unread[0]["message"], "hi");
    assert_eq!(unread[0]["receiver_user_id"], 2);

    let (_, count) = app.call(Method::GET, "/notifications/unread-count", ALICE, None).await;
    assert_eq!(count["count"], 0);
}
