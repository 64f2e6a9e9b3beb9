//! Database schema migrations.

use rusqlite::Connection;
use skipery_ai::StoreError;
use tracing::info;

use crate::db::storage_err;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| storage_err("Failed to create migrations table", e))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| storage_err("Failed to query migration version", e))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: sessions_and_messages");
    }

    Ok(())
}

/// Version 1: sessions and their ordered messages.
fn apply_v1(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY NOT NULL,
            title       TEXT,
            created_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS messages (
            id           TEXT PRIMARY KEY NOT NULL,
            session_id   TEXT NOT NULL,
            seq          INTEGER NOT NULL,
            author       TEXT NOT NULL
                         CHECK (author IN ('user', 'model', 'system')),
            content      TEXT NOT NULL DEFAULT '',
            tool_calls   TEXT NOT NULL DEFAULT '[]',
            tool_results TEXT NOT NULL DEFAULT '[]',
            created_at   INTEGER NOT NULL,
            FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE,
            UNIQUE (session_id, seq)
        );

        CREATE INDEX IF NOT EXISTS idx_messages_session
            ON messages (session_id, seq ASC);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'sessions_and_messages');
        ",
    )
    .map_err(|e| storage_err("Failed to apply migration v1", e))
}
