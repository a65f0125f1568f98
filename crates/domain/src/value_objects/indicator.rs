//! Token indicator state and the count transitions that change it.

use std::fmt;

/// Whether a token should display the "has conditions" indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorState {
    On,
    Off,
}

impl IndicatorState {
    /// Indicator state derived from a token's condition count.
    pub fn from_count(count: usize) -> Self {
        if count > 0 {
            Self::On
        } else {
            Self::Off
        }
    }

    /// Map a displayed on/off flag to a state.
    pub fn from_displayed(displayed: bool) -> Self {
        if displayed {
            Self::On
        } else {
            Self::Off
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// A change in a token's condition count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorTransition {
    pub before: usize,
    pub after: usize,
}

impl IndicatorTransition {
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }

    /// The indicator state to apply, if the count crossed the zero boundary.
    ///
    /// Only 0→1 turns the indicator on and only 1→0 turns it off.
    pub fn target(self) -> Option<IndicatorState> {
        match (self.before, self.after) {
            (0, 1) => Some(IndicatorState::On),
            (1, 0) => Some(IndicatorState::Off),
            _ => None,
        }
    }
}
