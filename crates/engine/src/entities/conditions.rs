//! Conditions entity module.
//!
//! The condition registry lives in the acting user's flag document. Every
//! mutation takes that user's write lock, fetches the latest document,
//! computes a partial patch and awaits the merge before returning. Indicator
//! updates follow a persisted write and only at 0→1 and 1→0 transitions.

use std::sync::Arc;

use condition_reminders_domain::common::{deletion_key, DELETE_KEY_PREFIX};
use condition_reminders_domain::{
    Condition, ConditionDraft, ConditionId, ConditionPatch, ConditionRegistry, IndicatorState,
    IndicatorTransition, TokenId, UserId,
};
use serde_json::{json, Map, Value};

use crate::entities::indicator::IndicatorSync;
use crate::infrastructure::app_settings::{DEFAULT_FLAG_KEY, DEFAULT_NAMESPACE};
use crate::infrastructure::ports::{FlagStore, HostError, RandomPort, RepoError, SelectionPort};
use crate::stores::UserWriteLocks;

#[derive(Debug, thiserror::Error)]
pub enum ConditionError {
    #[error("At least one token must be selected")]
    NoTokensSelected,
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted {
        condition: Condition,
        /// Tokens whose last condition this was
        indicators_cleared: Vec<TokenId>,
    },
    ConditionMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Condition),
    ConditionMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOutcome {
    /// Token bound; its total condition count afterwards
    Added { token_count: usize },
    /// Token unbound; its total condition count afterwards
    Removed { token_count: usize },
    AlreadyBound,
    NotBound,
    ConditionMissing,
}

/// Per-token result of a membership toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleReport {
    pub added: Vec<TokenId>,
    pub removed: Vec<TokenId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled(ToggleReport),
    ConditionMissing,
}

/// Conditions entity - the per-user condition registry.
pub struct Conditions {
    flags: Arc<dyn FlagStore>,
    selection: Arc<dyn SelectionPort>,
    indicators: Arc<IndicatorSync>,
    random: Arc<dyn RandomPort>,
    locks: Arc<UserWriteLocks>,
    namespace: String,
    flag_key: String,
}

impl Conditions {
    pub fn new(
        flags: Arc<dyn FlagStore>,
        selection: Arc<dyn SelectionPort>,
        indicators: Arc<IndicatorSync>,
        random: Arc<dyn RandomPort>,
        locks: Arc<UserWriteLocks>,
    ) -> Self {
        Self {
            flags,
            selection,
            indicators,
            random,
            locks,
            namespace: DEFAULT_NAMESPACE.to_string(),
            flag_key: DEFAULT_FLAG_KEY.to_string(),
        }
    }

    /// Store the registry somewhere other than the default flag.
    pub fn with_flag_location(
        mut self,
        namespace: impl Into<String>,
        flag_key: impl Into<String>,
    ) -> Self {
        self.namespace = namespace.into();
        self.flag_key = flag_key.into();
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fresh snapshot of the user's registry.
    pub async fn registry(&self, user_id: &UserId) -> Result<ConditionRegistry, RepoError> {
        let value = self
            .flags
            .get(user_id, &self.namespace, &self.flag_key)
            .await?;
        Ok(ConditionRegistry::from_flag(value))
    }

    pub async fn get(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
    ) -> Result<Option<Condition>, RepoError> {
        Ok(self.registry(user_id).await?.get(condition_id).cloned())
    }

    /// All conditions in registry order.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Condition>, RepoError> {
        Ok(self.registry(user_id).await?.iter().cloned().collect())
    }

    pub async fn len(&self, user_id: &UserId) -> Result<usize, RepoError> {
        Ok(self.registry(user_id).await?.len())
    }

    pub async fn count_for_token(
        &self,
        user_id: &UserId,
        token_id: &TokenId,
    ) -> Result<usize, RepoError> {
        Ok(self.registry(user_id).await?.count_for_token(token_id))
    }

    pub async fn conditions_for_token(
        &self,
        user_id: &UserId,
        token_id: &TokenId,
    ) -> Result<Vec<Condition>, RepoError> {
        Ok(self
            .registry(user_id)
            .await?
            .conditions_for_token(token_id)
            .into_iter()
            .cloned()
            .collect())
    }

    // =========================================================================
    // Registry mutations
    // =========================================================================

    pub async fn create(
        &self,
        user_id: &UserId,
        draft: ConditionDraft,
    ) -> Result<Condition, ConditionError> {
        let _guard = self.locks.lock(user_id).await;
        let registry = self.registry(user_id).await?;

        let mut id = ConditionId::from_uuid(self.random.gen_uuid());
        while registry.contains(id) {
            id = ConditionId::from_uuid(self.random.gen_uuid());
        }

        let condition = Condition::new(id, user_id.clone(), draft);
        let value = serde_json::to_value(&condition).map_err(RepoError::serialization)?;
        self.write(user_id, entry_patch(id, value)).await?;

        tracing::info!(condition_id = %id, user_id = %user_id, "Condition created");
        Ok(condition)
    }

    pub async fn delete(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
    ) -> Result<DeleteOutcome, ConditionError> {
        let _guard = self.locks.lock(user_id).await;
        let registry = self.registry(user_id).await?;

        let Some(condition) = registry.get(condition_id).cloned() else {
            tracing::warn!(condition_id = %condition_id, "Cannot delete unknown condition");
            return Ok(DeleteOutcome::ConditionMissing);
        };

        // Counts come from the pre-removal snapshot
        let indicators_cleared: Vec<TokenId> = condition
            .token_ids()
            .iter()
            .filter(|t| registry.count_for_token(t) == 1)
            .cloned()
            .collect();

        let mut patch = Map::new();
        patch.insert(deletion_key(&condition_id.to_string()), Value::Null);
        self.write(user_id, Value::Object(patch)).await?;

        for token_id in &indicators_cleared {
            self.apply_indicator(token_id, IndicatorState::Off).await;
        }

        tracing::info!(
            condition_id = %condition_id,
            cleared = indicators_cleared.len(),
            "Condition deleted"
        );
        Ok(DeleteOutcome::Deleted {
            condition,
            indicators_cleared,
        })
    }

    pub async fn update(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
        patch: ConditionPatch,
    ) -> Result<UpdateOutcome, ConditionError> {
        let _guard = self.locks.lock(user_id).await;
        let mut registry = self.registry(user_id).await?;

        let Some(condition) = registry.get_mut(condition_id) else {
            tracing::warn!(condition_id = %condition_id, "Cannot update unknown condition");
            return Ok(UpdateOutcome::ConditionMissing);
        };
        condition.apply(&patch);
        let updated = condition.clone();

        if !patch.is_empty() {
            let value = serde_json::to_value(&patch).map_err(RepoError::serialization)?;
            self.write(user_id, entry_patch(condition_id, value)).await?;
        }

        Ok(UpdateOutcome::Updated(updated))
    }

    /// Merge an arbitrary bulk edit into the registry document in one write.
    ///
    /// Only entries for conditions currently in the registry (and deletion
    /// markers) are written. Field types aren't checked here; entries that no
    /// longer decode are skipped on the next read.
    pub async fn update_all(&self, user_id: &UserId, data: Value) -> Result<(), ConditionError> {
        let _guard = self.locks.lock(user_id).await;

        let Value::Object(entries) = data else {
            tracing::warn!(user_id = %user_id, "Bulk condition update is not an object, ignoring");
            return Ok(());
        };
        let registry = self.registry(user_id).await?;

        let mut patch = Map::with_capacity(entries.len());
        for (key, entry) in entries {
            let known = key.starts_with(DELETE_KEY_PREFIX)
                || key
                    .parse::<ConditionId>()
                    .is_ok_and(|id| registry.contains(id));
            if known {
                patch.insert(key, entry);
            } else {
                tracing::warn!(key = %key, "Dropping bulk edit for unknown condition");
            }
        }
        if patch.is_empty() {
            return Ok(());
        }

        self.write(user_id, Value::Object(patch)).await?;
        tracing::debug!(user_id = %user_id, "Bulk condition update written");
        Ok(())
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Flip membership of every selected token, each one decided against a
    /// fresh snapshot.
    pub async fn toggle_membership(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
    ) -> Result<ToggleOutcome, ConditionError> {
        let selected = self.selection.selected_tokens().await?;
        if selected.is_empty() {
            return Err(ConditionError::NoTokensSelected);
        }

        let mut report = ToggleReport::default();
        for token_id in &selected {
            let _guard = self.locks.lock(user_id).await;
            let registry = self.registry(user_id).await?;

            let bound = match registry.get(condition_id) {
                Some(condition) => condition.is_bound_to(token_id),
                None => {
                    tracing::warn!(condition_id = %condition_id, "Cannot toggle unknown condition");
                    if report == ToggleReport::default() {
                        return Ok(ToggleOutcome::ConditionMissing);
                    }
                    break;
                }
            };

            if bound {
                self.unbind_locked(user_id, registry, condition_id, token_id)
                    .await?;
                report.removed.push(token_id.clone());
            } else {
                self.bind_locked(user_id, registry, condition_id, token_id)
                    .await?;
                report.added.push(token_id.clone());
            }
        }

        Ok(ToggleOutcome::Toggled(report))
    }

    pub async fn add_binding(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
        token_id: &TokenId,
    ) -> Result<BindingOutcome, ConditionError> {
        let _guard = self.locks.lock(user_id).await;
        let registry = self.registry(user_id).await?;
        self.bind_locked(user_id, registry, condition_id, token_id)
            .await
    }

    pub async fn remove_binding(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
        token_id: &TokenId,
    ) -> Result<BindingOutcome, ConditionError> {
        let _guard = self.locks.lock(user_id).await;
        let registry = self.registry(user_id).await?;
        self.unbind_locked(user_id, registry, condition_id, token_id)
            .await
    }

    async fn bind_locked(
        &self,
        user_id: &UserId,
        mut registry: ConditionRegistry,
        condition_id: ConditionId,
        token_id: &TokenId,
    ) -> Result<BindingOutcome, ConditionError> {
        let before = registry.count_for_token(token_id);

        let patch = {
            let Some(condition) = registry.get_mut(condition_id) else {
                tracing::warn!(condition_id = %condition_id, "Cannot bind unknown condition");
                return Ok(BindingOutcome::ConditionMissing);
            };
            if !condition.bind(token_id.clone()) {
                tracing::debug!(condition_id = %condition_id, token_id = %token_id, "Token already bound");
                return Ok(BindingOutcome::AlreadyBound);
            }
            entry_patch(condition_id, json!({ "tokenIds": condition.token_ids() }))
        };
        self.write(user_id, patch).await?;

        let after = registry.count_for_token(token_id);
        self.sync_indicator(token_id, IndicatorTransition::new(before, after))
            .await;

        tracing::debug!(condition_id = %condition_id, token_id = %token_id, count = after, "Token bound");
        Ok(BindingOutcome::Added { token_count: after })
    }

    async fn unbind_locked(
        &self,
        user_id: &UserId,
        mut registry: ConditionRegistry,
        condition_id: ConditionId,
        token_id: &TokenId,
    ) -> Result<BindingOutcome, ConditionError> {
        let before = registry.count_for_token(token_id);

        let patch = {
            let Some(condition) = registry.get_mut(condition_id) else {
                tracing::warn!(condition_id = %condition_id, "Cannot unbind unknown condition");
                return Ok(BindingOutcome::ConditionMissing);
            };
            if !condition.unbind(token_id) {
                tracing::warn!(condition_id = %condition_id, token_id = %token_id, "Token not bound to condition");
                return Ok(BindingOutcome::NotBound);
            }
            entry_patch(condition_id, json!({ "tokenIds": condition.token_ids() }))
        };
        self.write(user_id, patch).await?;

        let after = registry.count_for_token(token_id);
        self.sync_indicator(token_id, IndicatorTransition::new(before, after))
            .await;

        tracing::debug!(condition_id = %condition_id, token_id = %token_id, count = after, "Token unbound");
        Ok(BindingOutcome::Removed { token_count: after })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn write(&self, user_id: &UserId, patch: Value) -> Result<(), RepoError> {
        self.flags
            .set(user_id, &self.namespace, &self.flag_key, patch)
            .await
    }

    async fn sync_indicator(&self, token_id: &TokenId, transition: IndicatorTransition) {
        if let Some(target) = transition.target() {
            self.apply_indicator(token_id, target).await;
        }
    }

    /// Host failures are logged; the binding is already persisted and the
    /// next reconciliation repairs the display.
    async fn apply_indicator(&self, token_id: &TokenId, target: IndicatorState) {
        if let Err(e) = self.indicators.set(token_id, target).await {
            tracing::warn!(token_id = %token_id, state = %target, error = %e, "Failed to update indicator");
        }
    }
}

fn entry_patch(condition_id: ConditionId, value: Value) -> Value {
    let mut patch = Map::new();
    patch.insert(condition_id.to_string(), value);
    Value::Object(patch)
}
