//! Combat use cases.
//!
//! Turn-start reminders in chat and the dismiss button they carry.

use std::sync::Arc;

mod announce_turn;
mod dismiss;

pub use announce_turn::{AnnounceError, AnnounceTurn, TurnOutcome};
pub use dismiss::{DismissCondition, DismissError, DismissOutcome};

/// Container for combat use cases.
pub struct CombatUseCases {
    pub announce_turn: Arc<AnnounceTurn>,
    pub dismiss: Arc<DismissCondition>,
}

impl CombatUseCases {
    pub fn new(announce_turn: Arc<AnnounceTurn>, dismiss: Arc<DismissCondition>) -> Self {
        Self {
            announce_turn,
            dismiss,
        }
    }
}
