//! Condition Reminders domain.
//!
//! Pure data and rules for user-defined conditions bound to tokens:
//! - `entities` - the `Condition` record and its edit types
//! - `aggregates` - the per-user `ConditionRegistry`
//! - `value_objects` - indicator transitions, turn tracking, announcements
//! - `common` - merge/expand helpers for persisted flag documents

extern crate self as condition_reminders_domain;

pub mod aggregates;
pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::ConditionRegistry;
pub use entities::{Condition, ConditionDraft, ConditionPatch, DEFAULT_DESCRIPTION, DEFAULT_LABEL};
pub use error::DomainError;
pub use ids::{ActorId, ChatMessageId, CombatantId, ConditionId, SceneId, TokenId, UserId};
pub use value_objects::{
    Announcement, Combatant, IndicatorState, IndicatorTransition, TurnChange, TurnObservation,
    TurnTracker,
};
