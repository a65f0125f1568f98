//! Announcement - one condition reminder for the token whose turn began.

use crate::entities::Condition;
use crate::ids::{ConditionId, TokenId};

/// A reminder that `token_id` is affected by a condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub condition_id: ConditionId,
    pub token_id: TokenId,
    pub label: String,
    pub description: String,
}

impl Announcement {
    pub fn for_condition(condition: &Condition, token_id: &TokenId) -> Self {
        Self {
            condition_id: condition.id(),
            token_id: token_id.clone(),
            label: condition.label().to_string(),
            description: condition.description().to_string(),
        }
    }
}
