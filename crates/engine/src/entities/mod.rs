//! Entity modules - Operations over the condition registry and token display.
//!
//! Each module wraps the ports it needs and exposes the operations use cases
//! build on.

pub mod conditions;
pub mod indicator;

pub use conditions::{
    BindingOutcome, ConditionError, Conditions, DeleteOutcome, ToggleOutcome, ToggleReport,
    UpdateOutcome,
};
pub use indicator::{IndicatorSync, IndicatorUpdate, ReconcileReport};
