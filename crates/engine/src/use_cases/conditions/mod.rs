//! Condition use cases.
//!
//! The condition list form the host renders: button actions, bulk
//! submission, direct edits and the listing it redraws from.

use std::sync::Arc;

mod form;

pub use form::{ConditionForm, FormAction, FormError, FormOutcome};

/// Container for condition use cases.
pub struct ConditionUseCases {
    pub form: Arc<ConditionForm>,
}

impl ConditionUseCases {
    pub fn new(form: Arc<ConditionForm>) -> Self {
        Self { form }
    }
}
