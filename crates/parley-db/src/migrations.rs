use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            -- Owned by the identity service; only read here.
            CREATE TABLE IF NOT EXISTS users (
                id          INTEGER PRIMARY KEY,
                username    TEXT NOT NULL,
                tarkov_name TEXT NOT NULL,
                socket_id   TEXT
            );

            CREATE TABLE messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                user_id     INTEGER NOT NULL REFERENCES users(id)
            );

            CREATE TABLE private_messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                message     TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                user_id     INTEGER NOT NULL REFERENCES users(id)
            );

            CREATE TABLE user_private_messages (
                message_id       INTEGER NOT NULL UNIQUE
                                 REFERENCES private_messages(id) ON DELETE CASCADE,
                sender_user_id   INTEGER NOT NULL REFERENCES users(id),
                receiver_user_id INTEGER NOT NULL REFERENCES users(id)
            );

            CREATE INDEX idx_upm_receiver
                ON user_private_messages(receiver_user_id, sender_user_id);
            CREATE INDEX idx_upm_sender
                ON user_private_messages(sender_user_id, receiver_user_id);

            -- unread: 1 = unread, 0 = read
            CREATE TABLE notifications (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                origin           TEXT NOT NULL,
                message          TEXT NOT NULL,
                created_at       TEXT NOT NULL,
                receiver_user_id INTEGER NOT NULL REFERENCES users(id),
                unread           INTEGER NOT NULL DEFAULT 1 CHECK (unread IN (0, 1))
            );

            CREATE INDEX idx_notifications_receiver
                ON notifications(receiver_user_id, unread);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
