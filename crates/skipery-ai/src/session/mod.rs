//! Chat session state.
//!
//! A `ChatSession` lives for one `send_message` call: it is loaded from the
//! store, extended by the turn loop, and persisted from the point where the
//! previous save stopped.

mod chat;
mod locks;

pub use chat::ChatSession;
pub use locks::{SessionGuard, SessionLocks};
