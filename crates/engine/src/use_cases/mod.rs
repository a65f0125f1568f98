//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area.
//! Use cases orchestrate across entity modules to fulfill user stories.

pub mod combat;
pub mod conditions;
pub mod session;

pub use combat::CombatUseCases;
pub use conditions::ConditionUseCases;
pub use session::SessionUseCases;
