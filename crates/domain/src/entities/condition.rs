//! Condition entity - A user-defined status effect bound to tokens
//!
//! Conditions are persisted inside the owning user's flag document:
//! - `{ "<id>": { "id", "label", "description", "userId", "tokenIds" } }`
//!
//! `tokenIds` keeps insertion order and never holds the same token twice.

use serde::{Deserialize, Serialize};

use crate::ids::{ConditionId, TokenId, UserId};

/// Placeholder label for freshly created conditions
pub const DEFAULT_LABEL: &str = "enter label";
/// Placeholder description for freshly created conditions
pub const DEFAULT_DESCRIPTION: &str = "enter description";

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

/// A status effect with a label, a description and the tokens it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    id: ConditionId,
    #[serde(default = "default_label")]
    label: String,
    #[serde(default = "default_description")]
    description: String,
    /// Stored as `userId` so the document matches the host flag layout
    #[serde(rename = "userId")]
    owner_id: UserId,
    #[serde(default)]
    token_ids: Vec<TokenId>,
}

impl Condition {
    /// Create a condition from caller-supplied fields merged over the defaults.
    pub fn new(id: ConditionId, owner_id: UserId, draft: ConditionDraft) -> Self {
        Self {
            id,
            label: draft.label.unwrap_or_else(default_label),
            description: draft.description.unwrap_or_else(default_description),
            owner_id,
            token_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> ConditionId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn token_ids(&self) -> &[TokenId] {
        &self.token_ids
    }

    pub fn is_bound_to(&self, token_id: &TokenId) -> bool {
        self.token_ids.contains(token_id)
    }

    /// Bind a token. Returns `false` when it was already bound.
    pub fn bind(&mut self, token_id: TokenId) -> bool {
        if self.is_bound_to(&token_id) {
            return false;
        }
        self.token_ids.push(token_id);
        true
    }

    /// Unbind a token. Returns `false` when it wasn't bound.
    pub fn unbind(&mut self, token_id: &TokenId) -> bool {
        let Some(index) = self.token_ids.iter().position(|t| t == token_id) else {
            return false;
        };
        self.token_ids.remove(index);
        true
    }

    /// Apply an edit; fields absent from the patch are left untouched.
    pub fn apply(&mut self, patch: &ConditionPatch) {
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }

    /// Drop repeated token ids, keeping the first occurrence.
    pub(crate) fn dedup_tokens(&mut self) -> usize {
        let before = self.token_ids.len();
        let mut seen: Vec<TokenId> = Vec::with_capacity(before);
        self.token_ids.retain(|t| {
            if seen.contains(t) {
                false
            } else {
                seen.push(t.clone());
                true
            }
        });
        before - self.token_ids.len()
    }

    pub(crate) fn set_id(&mut self, id: ConditionId) {
        self.id = id;
    }
}

/// Caller-supplied fields for a new condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDraft {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ConditionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial edit of a condition's text fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConditionPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            label: None,
            description: Some(description.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn condition() -> Condition {
        Condition::new(ConditionId::new(), UserId::new("gm"), ConditionDraft::new())
    }

    #[test]
    fn test_new_condition_uses_placeholders() {
        let c = condition();
        assert_eq!(c.label(), DEFAULT_LABEL);
        assert_eq!(c.description(), DEFAULT_DESCRIPTION);
        assert!(c.token_ids().is_empty());
        assert_eq!(c.owner_id().as_str(), "gm");
    }

    #[test]
    fn test_draft_fields_override_defaults() {
        let draft = ConditionDraft::new()
            .with_label("Poisoned")
            .with_description("Takes damage");
        let c = Condition::new(ConditionId::new(), UserId::new("gm"), draft);
        assert_eq!(c.label(), "Poisoned");
        assert_eq!(c.description(), "Takes damage");
    }

    #[test]
    fn test_bind_is_idempotent() {
        let mut c = condition();
        assert!(c.bind(TokenId::new("tok1")));
        assert!(!c.bind(TokenId::new("tok1")));
        assert_eq!(c.token_ids().len(), 1);
    }

    #[test]
    fn test_unbind_missing_token_reports_false() {
        let mut c = condition();
        c.bind(TokenId::new("tok1"));
        assert!(!c.unbind(&TokenId::new("tok2")));
        assert!(c.unbind(&TokenId::new("tok1")));
        assert!(c.token_ids().is_empty());
    }

    #[test]
    fn test_bind_preserves_insertion_order() {
        let mut c = condition();
        c.bind(TokenId::new("b"));
        c.bind(TokenId::new("a"));
        c.bind(TokenId::new("c"));
        c.unbind(&TokenId::new("a"));
        let ids: Vec<&str> = c.token_ids().iter().map(TokenId::as_str).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let draft = ConditionDraft::new().with_description("Takes damage");
        let mut c = Condition::new(ConditionId::new(), UserId::new("gm"), draft);
        c.bind(TokenId::new("tok1"));
        let before = c.clone();

        c.apply(&ConditionPatch::label("X"));

        assert_eq!(c.label(), "X");
        assert_eq!(c.description(), before.description());
        assert_eq!(c.token_ids(), before.token_ids());
        assert_eq!(c.id(), before.id());
    }

    #[test]
    fn test_serializes_with_host_field_names() {
        let mut c = condition();
        c.bind(TokenId::new("tok1"));
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["userId"], "gm");
        assert_eq!(value["tokenIds"], json!(["tok1"]));
        assert_eq!(value["label"], DEFAULT_LABEL);
    }

    #[test]
    fn test_missing_text_fields_fall_back_to_placeholders() {
        let id = ConditionId::new();
        let c: Condition =
            serde_json::from_value(json!({"id": id.to_string(), "userId": "gm"})).unwrap();
        assert_eq!(c.label(), DEFAULT_LABEL);
        assert!(c.token_ids().is_empty());
    }

    #[test]
    fn test_empty_patch_serializes_to_empty_object() {
        let patch = ConditionPatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
    }
}
