//! `SessionStore` backed by SQLite.
//!
//! rusqlite is blocking, so each operation runs on the blocking thread
//! pool against the shared `Database`.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use skipery_ai::{Author, Message, SessionId, SessionStore, SessionSummary, StoreError};
use skipery_common::new_id;
use tracing::debug;

use crate::db::{storage_err, Database};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Arc<Database>,
}

impl SqliteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Title of a session, if one was saved.
    pub fn title(&self, id: &SessionId) -> Result<Option<String>, StoreError> {
        self.db.with_conn(|conn| {
            let title: Option<Option<String>> = conn
                .query_row(
                    "SELECT title FROM sessions WHERE id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| storage_err("Failed to read title", e))?;
            Ok(title.flatten())
        })
    }

    async fn blocking<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&*db))
            .await
            .map_err(|e| storage_err("Storage task failed", e))?
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn ensure_session(conn: &Connection, id: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO sessions (id, title, created_at) VALUES (?1, NULL, ?2)",
        params![id, now()],
    )
    .map_err(|e| storage_err("Failed to create session", e))?;
    Ok(())
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    if raw.is_empty() {
        return serde_json::from_str("[]").map_err(|e| StoreError::Serialization(e.to_string()));
    }
    serde_json::from_str(raw).map_err(|e| StoreError::Serialization(e.to_string()))
}

struct MessageRow {
    author: String,
    content: String,
    tool_calls: String,
    tool_results: String,
}

impl MessageRow {
    fn into_message(self) -> Result<Message, StoreError> {
        let author = Author::parse(&self.author).ok_or_else(|| {
            StoreError::Serialization(format!("unknown author '{}'", self.author))
        })?;
        Ok(Message {
            author,
            text: self.content,
            tool_calls: decode(&self.tool_calls)?,
            tool_results: decode(&self.tool_results)?,
        })
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn save_title(&self, id: &SessionId, title: &str) -> Result<SessionId, StoreError> {
        let id = id.clone();
        let title = title.to_string();
        self.blocking(move |db| {
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO sessions (id, title, created_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET title = COALESCE(sessions.title, excluded.title)",
                    params![id.as_str(), title, now()],
                )
                .map_err(|e| storage_err("Failed to save title", e))?;
                Ok(id)
            })
        })
        .await
    }

    async fn get_messages(&self, id: &SessionId) -> Result<Vec<Message>, StoreError> {
        let id = id.clone();
        self.blocking(move |db| {
            db.with_conn(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT author, content, tool_calls, tool_results
                         FROM messages WHERE session_id = ?1 ORDER BY seq ASC",
                    )
                    .map_err(|e| storage_err("Failed to prepare query", e))?;

                let rows = stmt
                    .query_map(params![id.as_str()], |row| {
                        Ok(MessageRow {
                            author: row.get(0)?,
                            content: row.get(1)?,
                            tool_calls: row.get(2)?,
                            tool_results: row.get(3)?,
                        })
                    })
                    .map_err(|e| storage_err("Failed to fetch messages", e))?;

                let mut messages = Vec::new();
                for row in rows {
                    let row = row.map_err(|e| storage_err("Failed to read message", e))?;
                    messages.push(row.into_message()?);
                }
                Ok(messages)
            })
        })
        .await
    }

    async fn append_messages(
        &self,
        id: &SessionId,
        messages: &[Message],
    ) -> Result<(), StoreError> {
        if messages.is_empty() {
            return Ok(());
        }
        let id = id.clone();
        let messages = messages.to_vec();
        self.blocking(move |db| {
            db.with_conn(|conn| {
                let tx = conn
                    .unchecked_transaction()
                    .map_err(|e| storage_err("Failed to begin transaction", e))?;
                ensure_session(&tx, id.as_str())?;

                let next_seq: i64 = tx
                    .query_row(
                        "SELECT COALESCE(MAX(seq) + 1, 0) FROM messages WHERE session_id = ?1",
                        params![id.as_str()],
                        |row| row.get(0),
                    )
                    .map_err(|e| storage_err("Failed to read sequence", e))?;

                let created_at = now();
                for (offset, msg) in messages.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO messages
                         (id, session_id, seq, author, content, tool_calls, tool_results, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            new_id(),
                            id.as_str(),
                            next_seq + offset as i64,
                            msg.author.as_str(),
                            msg.text,
                            encode(&msg.tool_calls)?,
                            encode(&msg.tool_results)?,
                            created_at,
                        ],
                    )
                    .map_err(|e| storage_err("Failed to insert message", e))?;
                }

                tx.commit()
                    .map_err(|e| storage_err("Failed to commit messages", e))?;
                debug!(session = %id, count = messages.len(), "Appended messages");
                Ok(())
            })
        })
        .await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        self.blocking(|db| {
            db.with_conn(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT s.id, s.title, COUNT(m.id)
                         FROM sessions s LEFT JOIN messages m ON m.session_id = s.id
                         GROUP BY s.id
                         ORDER BY s.created_at ASC, s.id ASC",
                    )
                    .map_err(|e| storage_err("Failed to prepare query", e))?;

                let rows = stmt
                    .query_map([], |row| {
                        let count: i64 = row.get(2)?;
                        Ok(SessionSummary {
                            id: SessionId::from(row.get::<_, String>(0)?),
                            title: row.get(1)?,
                            message_count: count as usize,
                        })
                    })
                    .map_err(|e| storage_err("Failed to list sessions", e))?;

                rows.collect::<Result<Vec<_>, _>>()
                    .map_err(|e| storage_err("Failed to read session", e))
            })
        })
        .await
    }
}
