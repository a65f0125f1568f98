//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in flag storage:
//! - `SessionStore` - The acting user and once-per-session bookkeeping
//! - `UserWriteLocks` - Per-user serialization of registry writes

pub mod session;
pub mod write_locks;

pub use session::{SessionStore, SessionUser};
pub use write_locks::UserWriteLocks;
