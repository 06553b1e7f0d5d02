use anyhow::Result;
use chrono::Utc;
use parley_types::time::to_stored;
use rusqlite::params;

use crate::Database;
use crate::models::GlobalMessageRow;

impl Database {
    /// Every global message with its author's display name, oldest first.
    pub fn list_messages(&self) -> Result<Vec<GlobalMessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.description, m.created_at, m.user_id, u.tarkov_name
                 FROM messages m
                 JOIN users u ON u.id = m.user_id
                 ORDER BY m.id ASC",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(GlobalMessageRow {
                        id: row.get(0)?,
                        description: row.get(1)?,
                        created_at: row.get(2)?,
                        user_id: row.get(3)?,
                        tarkov_name: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Insert a global message stamped with the current time. Returns its id.
    pub fn insert_message(&self, author_id: i64, description: &str) -> Result<i64> {
        let now = to_stored(&Utc::now());
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (description, created_at, user_id) VALUES (?1, ?2, ?3)",
                params![description, now, author_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Replace the body of a global message. Returns false if no such message.
    pub fn update_message(&self, id: i64, description: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET description = ?2 WHERE id = ?1",
                params![id, description],
            )?;
            Ok(changed > 0)
        })
    }

    /// Returns false if no such message.
    pub fn delete_message(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}
