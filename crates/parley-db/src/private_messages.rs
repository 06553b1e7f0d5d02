use anyhow::{Context, Result};
use chrono::Utc;
use parley_types::time::to_stored;
use rusqlite::{Row, params};

use crate::Database;
use crate::models::ConversationEntryRow;
use crate::notifications::insert_notification;

const ENTRY_COLUMNS: &str = "pm.id, pm.message, pm.created_at, pm.user_id,
        upm.sender_user_id, upm.receiver_user_id, u.username
     FROM private_messages pm
     JOIN user_private_messages upm ON upm.message_id = pm.id
     JOIN users u ON u.id = upm.sender_user_id";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<ConversationEntryRow> {
    Ok(ConversationEntryRow {
        id: row.get(0)?,
        message: row.get(1)?,
        created_at: row.get(2)?,
        user_id: row.get(3)?,
        sender_user_id: row.get(4)?,
        receiver_user_id: row.get(5)?,
        sender_username: row.get(6)?,
    })
}

impl Database {
    /// Inbox summary: the newest entry from each distinct sender who has
    /// written to `caller_id`, ordered by sender username, then newest first.
    ///
    /// Senders are grouped by user id. Two senders that share a username show
    /// up as two entries.
    pub fn list_conversation_partners(&self, caller_id: i64) -> Result<Vec<ConversationEntryRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {ENTRY_COLUMNS}
                 WHERE upm.receiver_user_id = ?1
                   AND upm.message_id = (
                       SELECT MAX(latest.message_id)
                       FROM user_private_messages latest
                       WHERE latest.receiver_user_id = ?1
                         AND latest.sender_user_id = upm.sender_user_id
                   )
                 ORDER BY u.username ASC, pm.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map([caller_id], entry_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// All entries exchanged between the two users, in either direction, oldest first.
    pub fn list_thread(&self, caller_id: i64, partner_id: i64) -> Result<Vec<ConversationEntryRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {ENTRY_COLUMNS}
                 WHERE (upm.sender_user_id = ?1 AND upm.receiver_user_id = ?2)
                    OR (upm.sender_user_id = ?2 AND upm.receiver_user_id = ?1)
                 ORDER BY pm.id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map(params![caller_id, partner_id], entry_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Store a private message, its participants row, and a notification for
    /// the receiver. All three rows are written in one transaction; if any
    /// insert fails nothing is kept. Returns the new message id.
    pub fn send_private_message(&self, author_id: i64, receiver_id: i64, message: &str) -> Result<i64> {
        let now = to_stored(&Utc::now());
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO private_messages (message, created_at, user_id) VALUES (?1, ?2, ?3)",
                params![message, now, author_id],
            )
            .context("insert private message")?;
            let message_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO user_private_messages (message_id, sender_user_id, receiver_user_id)
                 VALUES (?1, ?2, ?3)",
                params![message_id, author_id, receiver_id],
            )
            .context("link private message participants")?;

            let origin: String = tx
                .query_row("SELECT username FROM users WHERE id = ?1", [author_id], |row| row.get(0))
                .context("look up sender username")?;
            insert_notification(&tx, &origin, receiver_id, message, &now)
                .context("notify receiver")?;

            tx.commit()?;
            Ok(message_id)
        })
    }

    /// Returns false if no such message.
    pub fn update_private_message(&self, id: i64, message: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE private_messages SET message = ?2 WHERE id = ?1",
                params![id, message],
            )?;
            Ok(changed > 0)
        })
    }

    /// Removes the message; its participants row goes with it.
    pub fn delete_private_message(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM private_messages WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}
