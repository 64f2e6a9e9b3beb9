//! Configuration schema types for skipery.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod agent;
mod logging;
mod model;
mod storage;

pub use agent::*;
pub use logging::*;
pub use model::*;
pub use storage::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkiperyConfig {
    pub agent: AgentConfig,
    pub model: ModelConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}
