//! Value objects - Immutable values without identity

mod announcement;
mod indicator;
mod turn;

pub use announcement::Announcement;
pub use indicator::{IndicatorState, IndicatorTransition};
pub use turn::{Combatant, TurnChange, TurnObservation, TurnTracker};
