//! Aggregates - Consistency boundaries over domain entities

pub mod condition_registry;

pub use condition_registry::ConditionRegistry;
