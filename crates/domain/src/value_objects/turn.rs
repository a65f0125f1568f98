//! Turn order values and the tracker that decides when a turn is new.

use crate::ids::{ActorId, CombatantId, TokenId};

/// One entry in the turn order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    pub id: Option<CombatantId>,
    pub actor_id: Option<ActorId>,
    pub token_id: Option<TokenId>,
    pub name: String,
}

/// A turn-order change reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnChange {
    /// Token reference of the combatant whose turn it now is
    pub current_token_id: Option<TokenId>,
    /// Full turn order
    pub combatants: Vec<Combatant>,
}

impl TurnChange {
    /// The combatant owning the current token reference, if any.
    pub fn active_combatant(&self) -> Option<&Combatant> {
        let current = self.current_token_id.as_ref()?;
        self.combatants
            .iter()
            .find(|c| c.token_id.as_ref() == Some(current))
    }
}

/// What the tracker made of a turn-order change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnObservation {
    /// First change seen; the tracker only records it
    Initialized,
    /// Same token as the previous change
    Repeated,
    /// A new turn for the given token reference
    Advanced(Option<TokenId>),
}

/// Two-state tracker for turn-order changes
///
/// `Idle` until the first change is observed, then `Tracking` the last token
/// reference. The first change never announces anything: hosts fire one while
/// the combat UI initializes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TurnTracker {
    #[default]
    Idle,
    Tracking { last_token: Option<TokenId> },
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn observe(&mut self, token: Option<&TokenId>) -> TurnObservation {
        match self {
            Self::Idle => {
                *self = Self::Tracking {
                    last_token: token.cloned(),
                };
                TurnObservation::Initialized
            }
            Self::Tracking { last_token } => {
                if last_token.as_ref() == token {
                    return TurnObservation::Repeated;
                }
                *last_token = token.cloned();
                TurnObservation::Advanced(token.cloned())
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking { .. })
    }

    pub fn last_token(&self) -> Option<&TokenId> {
        match self {
            Self::Idle => None,
            Self::Tracking { last_token } => last_token.as_ref(),
        }
    }
}
