//! `sql_query`: read-only SQL over the session database.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use skipery_ai::{ToolCapability, ToolDefinition, ToolError};

use crate::db::Database;

const FUNCTION: &str = "sql_query";

/// Rows returned to the model per query. Further rows are dropped and the
/// response is flagged `truncated`.
pub const MAX_ROWS: usize = 200;

struct QueryOutput {
    rows: Vec<Value>,
    truncated: bool,
}

/// Lets the model run read-only queries against the database.
///
/// Statements that would modify the database are rejected before they run.
#[derive(Debug, Clone)]
pub struct SqlQueryTool {
    db: Arc<Database>,
    max_rows: usize,
}

impl SqlQueryTool {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            max_rows: MAX_ROWS,
        }
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}

fn column_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => json!(i),
        ValueRef::Real(f) => json!(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<blob {} bytes>", bytes.len())),
    }
}

fn failed(message: impl std::fmt::Display) -> ToolError {
    ToolError::failed(FUNCTION, message.to_string())
}

fn query_rows(conn: &Connection, query: &str, limit: usize) -> Result<QueryOutput, ToolError> {
    let mut stmt = conn
        .prepare(query)
        .map_err(|e| failed(format!("failed to prepare query: {e}")))?;
    if !stmt.readonly() {
        return Err(failed("only read-only statements are allowed"));
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt
        .query([])
        .map_err(|e| failed(format!("failed to execute query: {e}")))?;

    let mut out = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|e| failed(format!("error iterating rows: {e}")))?
    {
        if out.len() == limit {
            return Ok(QueryOutput {
                rows: out,
                truncated: true,
            });
        }
        let mut object = Map::new();
        for (index, name) in columns.iter().enumerate() {
            let value = row
                .get_ref(index)
                .map_err(|e| failed(format!("failed to scan row: {e}")))?;
            object.insert(name.clone(), column_value(value));
        }
        out.push(Value::Object(object));
    }
    Ok(QueryOutput {
        rows: out,
        truncated: false,
    })
}

fn run_query(db: &Database, query: &str, limit: usize) -> Result<QueryOutput, ToolError> {
    db.with_conn(|conn| Ok(query_rows(conn, query, limit)))
        .map_err(failed)?
}

#[async_trait]
impl ToolCapability for SqlQueryTool {
    fn functions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new(
            FUNCTION,
            "SQL Query",
            "Execute a read-only SQL query against the database and return the results",
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }),
        )
        .with_response(json!({
            "type": "object",
            "properties": {
                "results": { "type": "array", "items": { "type": "object" } },
                "truncated": { "type": "boolean" }
            }
        }))]
    }

    async fn call(&self, function: &str, args: &Map<String, Value>) -> Result<Value, ToolError> {
        if function != FUNCTION {
            return Err(ToolError::NotFound(function.to_string()));
        }
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::failed(FUNCTION, "query parameter must be a string"))?
            .to_string();

        let db = Arc::clone(&self.db);
        let limit = self.max_rows;
        let output = tokio::task::spawn_blocking(move || run_query(&db, &query, limit))
            .await
            .map_err(failed)??;

        if output.truncated {
            Ok(json!({ "results": output.rows, "truncated": true }))
        } else {
            Ok(json!({ "results": output.rows }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skipery_ai::{Message, SessionId, SessionStore};

    use crate::SqliteStore;

    fn query_args(query: &str) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("query".into(), json!(query));
        args
    }

    async fn seeded() -> (SqlQueryTool, Arc<Database>) {
        let db = Arc::new(Database::in_memory().unwrap());
        let store = SqliteStore::new(Arc::clone(&db));
        let id = SessionId::from("s1");
        store.save_title(&id, "Numbers").await.unwrap();
        store
            .append_messages(&id, &[Message::user("hi"), Message::model("hello", vec![])])
            .await
            .unwrap();
        (SqlQueryTool::new(Arc::clone(&db)), db)
    }

    #[tokio::test]
    async fn select_returns_row_objects() {
        let (tool, _db) = seeded().await;
        let out = tool
            .call(
                FUNCTION,
                &query_args("SELECT author, seq FROM messages ORDER BY seq"),
            )
            .await
            .unwrap();

        assert_eq!(
            out,
            json!({ "results": [
                { "author": "user", "seq": 0 },
                { "author": "model", "seq": 1 }
            ]})
        );
    }

    #[tokio::test]
    async fn empty_result_is_empty_array() {
        let (tool, _db) = seeded().await;
        let out = tool
            .call(FUNCTION, &query_args("SELECT id FROM sessions WHERE id = 'none'"))
            .await
            .unwrap();
        assert_eq!(out, json!({ "results": [] }));
    }

    #[tokio::test]
    async fn large_results_are_truncated() {
        let (tool, _db) = seeded().await;
        let tool = tool.with_max_rows(1);
        let out = tool
            .call(
                FUNCTION,
                &query_args("SELECT author FROM messages ORDER BY seq"),
            )
            .await
            .unwrap();

        assert_eq!(
            out,
            json!({ "results": [{ "author": "user" }], "truncated": true })
        );
    }

    #[tokio::test]
    async fn result_at_limit_is_not_truncated() {
        let (tool, _db) = seeded().await;
        let tool = tool.with_max_rows(2);
        let out = tool
            .call(FUNCTION, &query_args("SELECT seq FROM messages ORDER BY seq"))
            .await
            .unwrap();

        assert_eq!(out, json!({ "results": [{ "seq": 0 }, { "seq": 1 }] }));
    }

    #[tokio::test]
    async fn writes_are_rejected() {
        let (tool, db) = seeded().await;
        let err = tool
            .call(FUNCTION, &query_args("DELETE FROM messages"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("read-only"));

        let remaining: i64 = db
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
                    .map_err(|e| crate::db::storage_err("count", e))
            })
            .unwrap();
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn invalid_sql_fails() {
        let (tool, _db) = seeded().await;
        let err = tool
            .call(FUNCTION, &query_args("SELEC nonsense"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn missing_query_fails() {
        let (tool, _db) = seeded().await;
        let err = tool.call(FUNCTION, &Map::new()).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::failed(FUNCTION, "query parameter must be a string")
        );
    }
}
