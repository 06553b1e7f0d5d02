use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Auth --

/// Claims carried by bearer tokens issued by the identity service.
/// `sub` is the authenticated user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Global channel --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostMessageRequest {
    pub message: String,
}

/// Body replacement for both global and private messages.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalMessageResponse {
    pub id: i64,
    pub description: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub tarkov_name: String,
}

// -- Private conversations --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendPrivateMessageRequest {
    pub message: String,
    #[serde(alias = "receiverId")]
    pub receiver_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntryResponse {
    pub id: i64,
    pub message: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub sender_user_id: i64,
    pub receiver_user_id: i64,
    /// Username of the sender.
    pub username: String,
}

// -- Notifications --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNotificationRequest {
    pub from: String,
    #[serde(alias = "receiverId")]
    pub receiver_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub from: String,
    pub message: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub receiver_user_id: i64,
    pub unread: bool,
    /// Legacy encoding kept for older clients: `1` means unread, `0` read.
    #[serde(rename = "isRead")]
    pub is_read: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}
