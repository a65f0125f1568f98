//! Domain entities - Core business objects with identity

mod condition;

pub use condition::{
    Condition, ConditionDraft, ConditionPatch, DEFAULT_DESCRIPTION, DEFAULT_LABEL,
};
