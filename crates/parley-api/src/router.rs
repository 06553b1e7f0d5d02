use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::AppState;
use crate::middleware::require_auth;
use crate::{messages, notifications, private_messages};

/// All routes. Everything except `/health` sits behind [`require_auth`].
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/messages",
            get(messages::list_messages).post(messages::post_message),
        )
        .route(
            "/messages/{id}",
            put(messages::update_message).delete(messages::delete_message),
        )
        .route(
            "/private-messages",
            get(private_messages::list_conversation_partners)
                .post(private_messages::send_private_message),
        )
        .route(
            "/private-messages/{id}",
            get(private_messages::list_thread)
                .put(private_messages::update_private_message)
                .delete(private_messages::delete_private_message),
        )
        .route(
            "/notifications",
            get(notifications::list_unread).post(notifications::create_notification),
        )
        .route("/notifications/unread-count", get(notifications::count_unread))
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(protected_routes)
}

async fn health() -> &'static str {
    "ok"
}
