//! Name-keyed registry of tool functions.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::{ToolCapability, ToolDefinition, ToolError};

struct Entry {
    definition: ToolDefinition,
    capability: Arc<dyn ToolCapability>,
}

/// Routes a tool call to the capability that registered its name.
///
/// Registering a name twice replaces the earlier entry. Definitions keep
/// the order in which each name was first seen.
#[derive(Default)]
pub struct ToolDispatcher {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
}

impl ToolDispatcher {
    pub fn new(capabilities: impl IntoIterator<Item = Arc<dyn ToolCapability>>) -> Self {
        let mut dispatcher = Self::default();
        for capability in capabilities {
            dispatcher.register(capability);
        }
        dispatcher
    }

    pub fn register(&mut self, capability: Arc<dyn ToolCapability>) {
        for definition in capability.functions() {
            let name = definition.name.clone();
            let entry = Entry {
                definition,
                capability: Arc::clone(&capability),
            };
            if self.entries.insert(name.clone(), entry).is_some() {
                debug!(function = %name, "Replacing previously registered tool");
            } else {
                self.order.push(name);
            }
        }
    }

    /// Registered descriptors, in first-registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name))
            .map(|entry| entry.definition.clone())
            .collect()
    }

    pub async fn call(&self, name: &str, args: &Map<String, Value>) -> Result<Value, ToolError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        debug!(function = %name, "Dispatching tool call");
        entry.capability.call(name, args).await
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("functions", &self.order)
            .finish()
    }
}
