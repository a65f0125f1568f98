//! Common utility functions for persisted flag documents.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Shared semantics** - every flag store adapter merges through these helpers

pub mod expand;
pub mod merge;

pub use expand::expand_object;
pub use merge::{deletion_key, merge_object, DELETE_KEY_PREFIX};
