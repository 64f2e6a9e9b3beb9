pub mod errors;
pub mod id;

pub use errors::{ConfigError, SkiperyError};
pub use id::{new_id, SessionId};
