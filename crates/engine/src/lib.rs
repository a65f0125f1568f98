//! Condition Reminders Engine library.
//!
//! Tracks user-defined conditions bound to tabletop tokens, keeps the token
//! indicator icon in step and posts reminders when a token's turn starts.
//!
//! ## Structure
//!
//! - `entities/` - Condition registry and indicator operations
//! - `use_cases/` - User story orchestration across entities
//! - `stores/` - In-memory session state and write locks
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - Host bridge entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;


pub use app::App;
