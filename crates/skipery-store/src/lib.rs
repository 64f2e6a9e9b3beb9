//! SQLite persistence for skipery sessions.
//!
//! Provides a migrated database handle, a `SessionStore` implementation
//! over it, and the `sql_query` tool that lets the model read from the
//! same database.

pub mod db;
pub mod migrations;
pub mod repository;
pub mod sql_tool;

pub use db::Database;
pub use repository::SqliteStore;
pub use sql_tool::SqlQueryTool;
