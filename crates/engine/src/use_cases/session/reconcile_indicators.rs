//! Startup indicator reconciliation.
//!
//! Indicator icons live on the host's tokens and can drift from the registry
//! (flags edited elsewhere, a toggle lost while the engine was down). The GM's
//! session repairs them once, after the first scene snapshot arrives.

use std::sync::Arc;

use condition_reminders_domain::UserId;

use crate::entities::{Conditions, IndicatorSync, ReconcileReport};
use crate::infrastructure::ports::{HostError, RepoError};
use crate::stores::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No `Ready` event has identified the user yet
    NoSession,
    /// Only the GM's session reconciles
    NotGm,
    AlreadyReconciled,
    Reconciled(ReconcileReport),
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Use case for the once-per-session indicator repair.
pub struct ReconcileIndicators {
    session: Arc<SessionStore>,
    conditions: Arc<Conditions>,
    indicators: Arc<IndicatorSync>,
}

impl ReconcileIndicators {
    pub fn new(
        session: Arc<SessionStore>,
        conditions: Arc<Conditions>,
        indicators: Arc<IndicatorSync>,
    ) -> Self {
        Self {
            session,
            conditions,
            indicators,
        }
    }

    pub async fn execute(&self) -> Result<ReconcileOutcome, ReconcileError> {
        let Some(user) = self.session.user().await else {
            return Ok(ReconcileOutcome::NoSession);
        };
        if !user.is_gm {
            return Ok(ReconcileOutcome::NotGm);
        }
        if !self.session.claim_reconciliation() {
            return Ok(ReconcileOutcome::AlreadyReconciled);
        }

        match self.run(&user.user_id).await {
            Ok(report) => Ok(ReconcileOutcome::Reconciled(report)),
            Err(e) => {
                self.session.release_reconciliation();
                Err(e)
            }
        }
    }

    async fn run(&self, user_id: &UserId) -> Result<ReconcileReport, ReconcileError> {
        let registry = self.conditions.registry(user_id).await?;
        Ok(self.indicators.reconcile(&registry).await?)
    }
}
