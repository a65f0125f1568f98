//! Indicator entity module.
//!
//! Keeps the "has conditions" icon on tokens in step with the registry. The
//! host only offers a flip, so every write goes through [`IndicatorSync::set`],
//! which reads the displayed state first and flips only on a mismatch.

use std::sync::Arc;

use condition_reminders_domain::{ConditionRegistry, IndicatorState, TokenId};

use crate::infrastructure::ports::{HostError, SceneGraphPort};

/// Result of an idempotent indicator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorUpdate {
    /// The icon was flipped to the target state
    Changed,
    /// The token already showed the target state
    Unchanged,
    /// The token isn't on the active scene
    TokenMissing,
}

/// Outcome of a full reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub checked: usize,
    pub corrected: Vec<TokenId>,
}

/// Indicator entity - drives the token indicator icon.
pub struct IndicatorSync {
    scene: Arc<dyn SceneGraphPort>,
    icon: String,
}

impl IndicatorSync {
    pub fn new(scene: Arc<dyn SceneGraphPort>, icon: impl Into<String>) -> Self {
        Self {
            scene,
            icon: icon.into(),
        }
    }

    /// Bring one token's indicator to `target`.
    pub async fn set(
        &self,
        token_id: &TokenId,
        target: IndicatorState,
    ) -> Result<IndicatorUpdate, HostError> {
        let Some(token) = self.scene.token(token_id).await? else {
            tracing::warn!(token_id = %token_id, "Token not on the active scene, indicator left alone");
            return Ok(IndicatorUpdate::TokenMissing);
        };

        if IndicatorState::from_displayed(token.has_indicator) == target {
            return Ok(IndicatorUpdate::Unchanged);
        }

        self.scene.toggle_indicator(token_id, &self.icon).await?;
        tracing::debug!(token_id = %token_id, state = %target, "Indicator toggled");
        Ok(IndicatorUpdate::Changed)
    }

    /// Correct every token on the active scene whose displayed indicator
    /// disagrees with the registry.
    pub async fn reconcile(
        &self,
        registry: &ConditionRegistry,
    ) -> Result<ReconcileReport, HostError> {
        let tokens = self.scene.tokens().await?;
        let mut report = ReconcileReport {
            checked: tokens.len(),
            corrected: Vec::new(),
        };

        for token in tokens {
            let desired = registry.indicator_for(&token.id);
            if IndicatorState::from_displayed(token.has_indicator) == desired {
                continue;
            }
            self.scene.toggle_indicator(&token.id, &self.icon).await?;
            report.corrected.push(token.id);
        }

        tracing::info!(
            checked = report.checked,
            corrected = report.corrected.len(),
            "Indicator reconciliation complete"
        );
        Ok(report)
    }
}
