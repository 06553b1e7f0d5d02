use anyhow::Result;
use chrono::Utc;
use parley_types::models::ReadState;
use parley_types::time::to_stored;
use rusqlite::{Connection, params};

use crate::Database;
use crate::models::NotificationRow;

impl Database {
    /// Unread notifications addressed to `receiver_id`, oldest first.
    pub fn list_unread_notifications(&self, receiver_id: i64) -> Result<Vec<NotificationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, origin, message, created_at, receiver_user_id, unread
                 FROM notifications
                 WHERE receiver_user_id = ?1 AND unread = ?2
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map(params![receiver_id, ReadState::UNREAD_FLAG], |row| {
                    Ok(NotificationRow {
                        id: row.get(0)?,
                        origin: row.get(1)?,
                        message: row.get(2)?,
                        created_at: row.get(3)?,
                        receiver_user_id: row.get(4)?,
                        read_state: ReadState::from_flag(row.get(5)?),
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn count_unread_notifications(&self, receiver_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM notifications WHERE receiver_user_id = ?1 AND unread = ?2",
                params![receiver_id, ReadState::UNREAD_FLAG],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    /// New notifications start unread via the column default.
    pub fn create_notification(&self, origin: &str, receiver_id: i64, message: &str) -> Result<i64> {
        let now = to_stored(&Utc::now());
        self.with_conn(|conn| Ok(insert_notification(conn, origin, receiver_id, message, &now)?))
    }

    /// Flip a notification to read. There is no way back to unread.
    ///
    /// Returns false only when the id does not exist; marking an already-read
    /// notification again still counts as a hit.
    pub fn mark_notification_read(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE notifications SET unread = ?2 WHERE id = ?1",
                params![id, ReadState::READ_FLAG],
            )?;
            Ok(changed > 0)
        })
    }
}

pub(crate) fn insert_notification(
    conn: &Connection,
    origin: &str,
    receiver_id: i64,
    message: &str,
    created_at: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO notifications (origin, message, created_at, receiver_user_id) VALUES (?1, ?2, ?3, ?4)",
        params![origin, message, created_at, receiver_id],
    )?;
    Ok(conn.last_insert_rowid())
}
