//! Database row types — these map directly to SQLite rows.
//! Distinct from parley-types API models to keep the DB layer independent.

use parley_types::models::ReadState;

/// Global channel message joined with its author's display name.
pub struct GlobalMessageRow {
    pub id: i64,
    pub description: String,
    pub created_at: String,
    pub user_id: i64,
    pub tarkov_name: String,
}

/// A private message together with its participants row.
pub struct ConversationEntryRow {
    pub id: i64,
    pub message: String,
    pub created_at: String,
    pub user_id: i64,
    pub sender_user_id: i64,
    pub receiver_user_id: i64,
    pub sender_username: String,
}

pub struct NotificationRow {
    pub id: i64,
    pub origin: String,
    pub message: String,
    pub created_at: String,
    pub receiver_user_id: i64,
    pub read_state: ReadState,
}
