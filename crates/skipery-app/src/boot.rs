//! Wiring: store, gateway, and tools from config and CLI flags.

use std::sync::Arc;

use skipery_ai::{
    Agent, GeminiClient, GeminiConfig, MathTool, MemoryStore, SessionStore, ToolCapability,
    ToolDispatcher, UserNameTool,
};
use skipery_common::SkiperyError;
use skipery_config::SkiperyConfig;
use skipery_store::{Database, SqlQueryTool, SqliteStore};
use tracing::info;

use crate::cli::Args;

/// The selected session store, plus the database behind it when there is one.
pub struct Storage {
    pub store: Arc<dyn SessionStore>,
    pub database: Option<Arc<Database>>,
}

pub fn open_storage(args: &Args, config: &SkiperyConfig) -> Result<Storage, SkiperyError> {
    if args.memory {
        info!("Using in-memory session store");
        return Ok(Storage {
            store: Arc::new(MemoryStore::new()),
            database: None,
        });
    }

    let path = args
        .db
        .clone()
        .unwrap_or_else(|| config.storage.resolve_db_path());
    let database =
        Arc::new(Database::new(&path).map_err(|e| SkiperyError::Storage(e.to_string()))?);
    Ok(Storage {
        store: Arc::new(SqliteStore::new(Arc::clone(&database))),
        database: Some(database),
    })
}

/// Built-in tools, plus `sql_query` when history lives in SQLite.
pub fn build_tools(database: Option<&Arc<Database>>) -> ToolDispatcher {
    let mut tools = ToolDispatcher::new([
        Arc::new(UserNameTool) as Arc<dyn ToolCapability>,
        Arc::new(MathTool) as Arc<dyn ToolCapability>,
    ]);
    if let Some(db) = database {
        tools.register(Arc::new(SqlQueryTool::new(Arc::clone(db))));
    }
    tools
}

pub fn build_agent(config: &SkiperyConfig, storage: &Storage) -> Result<Agent, SkiperyError> {
    let api_key = config.model.api_key().ok_or_else(|| {
        SkiperyError::Model(format!("{} is not set", config.model.api_key_env))
    })?;
    let gemini = GeminiClient::new(GeminiConfig::from_model_config(api_key, &config.model))
        .map_err(|e| SkiperyError::Model(e.to_string()))?;

    let tools = build_tools(storage.database.as_ref());
    info!(
        model = %config.model.model,
        tools = tools.len(),
        "Agent ready"
    );

    Ok(Agent::new(
        Arc::new(gemini),
        tools,
        Arc::clone(&storage.store),
        config.agent.clone(),
    ))
}
