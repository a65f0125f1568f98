//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod app_settings;
pub mod bridge;
pub mod clock;
pub mod flag_store;
pub mod localization;
pub mod ports;
