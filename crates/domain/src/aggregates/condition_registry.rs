//! Condition registry aggregate - One user's conditions and their bindings
//!
//! # Invariants
//!
//! - Keys are unique and always equal the stored condition's id
//! - Iteration follows insertion order
//! - A token's indicator state is derived from the registry, never stored:
//!   `has_indicator(token) == count_for_token(token) > 0`
//!
//! Token ids are not validated against any scene; a binding may outlive the
//! token it names.

use indexmap::IndexMap;
use serde_json::Value;

use crate::entities::Condition;
use crate::error::DomainError;
use crate::ids::{ConditionId, TokenId};
use crate::value_objects::IndicatorState;

/// All conditions owned by a single user, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionRegistry {
    conditions: IndexMap<ConditionId, Condition>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Flag document conversion
    // =========================================================================

    /// Decode a persisted flag document.
    ///
    /// Entries that can't be decoded are skipped with a warning, so one bad
    /// record never hides the others. A missing document is an empty registry.
    pub fn from_flag(value: Option<Value>) -> Self {
        let mut registry = Self::new();

        let entries = match value {
            None | Some(Value::Null) => return registry,
            Some(Value::Object(entries)) => entries,
            Some(other) => {
                tracing::warn!(found = %kind_of(&other), "Condition flag is not an object, ignoring");
                return registry;
            }
        };

        for (key, entry) in entries {
            match decode_entry(&key, entry) {
                Ok(condition) => {
                    registry.conditions.insert(condition.id(), condition);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping undecodable condition entry");
                }
            }
        }

        registry
    }

    // =========================================================================
    // Entries
    // =========================================================================

    pub fn get(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.get(&id)
    }

    pub fn get_mut(&mut self, id: ConditionId) -> Option<&mut Condition> {
        self.conditions.get_mut(&id)
    }

    pub fn contains(&self, id: ConditionId) -> bool {
        self.conditions.contains_key(&id)
    }

    /// Insert a new condition. Existing ids are never overwritten.
    pub fn insert(&mut self, condition: Condition) -> Result<(), DomainError> {
        let id = condition.id();
        if self.conditions.contains_key(&id) {
            return Err(DomainError::validation(format!(
                "Condition {} already exists",
                id
            )));
        }
        self.conditions.insert(id, condition);
        Ok(())
    }

    /// Remove a condition, preserving the order of the rest.
    pub fn remove(&mut self, id: ConditionId) -> Option<Condition> {
        self.conditions.shift_remove(&id)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.values()
    }

    // =========================================================================
    // Token queries
    // =========================================================================

    /// Number of conditions bound to `token_id`.
    pub fn count_for_token(&self, token_id: &TokenId) -> usize {
        self.iter().filter(|c| c.is_bound_to(token_id)).count()
    }

    /// Conditions bound to `token_id`, in registry order.
    pub fn conditions_for_token(&self, token_id: &TokenId) -> Vec<&Condition> {
        self.iter().filter(|c| c.is_bound_to(token_id)).collect()
    }

    /// Derived indicator state for a token.
    pub fn indicator_for(&self, token_id: &TokenId) -> IndicatorState {
        IndicatorState::from_count(self.count_for_token(token_id))
    }
}

fn decode_entry(key: &str, mut entry: Value) -> Result<Condition, DomainError> {
    let id: ConditionId = key.parse()?;

    if let Value::Object(fields) = &mut entry {
        fields
            .entry("id".to_string())
            .or_insert_with(|| Value::String(key.to_string()));
    }

    let mut condition: Condition = serde_json::from_value(entry)?;
    if condition.id() != id {
        tracing::warn!(key = %key, stored_id = %condition.id(), "Condition id differs from its key, using key");
        condition.set_id(id);
    }

    let dropped = condition.dedup_tokens();
    if dropped > 0 {
        tracing::warn!(condition_id = %id, dropped, "Dropped duplicate token bindings");
    }

    Ok(condition)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
