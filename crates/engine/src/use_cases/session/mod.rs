//! Session use cases.
//!
//! Orchestrates once-per-session flows for the connected host user.

use std::sync::Arc;

mod reconcile_indicators;

pub use reconcile_indicators::{ReconcileError, ReconcileIndicators, ReconcileOutcome};

/// Container for session use cases.
pub struct SessionUseCases {
    pub reconcile_indicators: Arc<ReconcileIndicators>,
}

impl SessionUseCases {
    pub fn new(reconcile_indicators: Arc<ReconcileIndicators>) -> Self {
        Self {
            reconcile_indicators,
        }
    }
}
