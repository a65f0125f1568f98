//! Host event dispatch.

use std::sync::Arc;

use condition_reminders_domain::{
    ChatMessageId, ConditionId, ConditionPatch, DomainError, SceneId, TokenId, UserId,
};
use condition_reminders_shared::{EngineCommand, HostEvent};
use serde_json::{Map, Value};

use crate::app::App;
use crate::infrastructure::bridge::convert::{
    condition_to_data, token_from_data, turn_change_from_data,
};
use crate::infrastructure::ports::HostError;
use crate::stores::SessionUser;
use crate::use_cases::combat::{AnnounceError, DismissError, TurnOutcome};
use crate::use_cases::conditions::FormError;
use crate::use_cases::session::{ReconcileError, ReconcileOutcome};

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("No session user yet, waiting for Ready")]
    NotReady,
    #[error("Malformed host event: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidId(#[from] DomainError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Announce(#[from] AnnounceError),
    #[error(transparent)]
    Dismiss(#[from] DismissError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Routes host events to use cases, one at a time.
pub struct HostEventHandler {
    app: Arc<App>,
}

impl HostEventHandler {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// Handle one raw protocol line. Failures are logged and reported to
    /// the host as an `Error` command; they never stop the engine.
    pub async fn handle_line(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let result = match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => self.handle(event).await,
            Err(e) => Err(HandlerError::Protocol(e)),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to handle host event");
            if let Err(send_err) = self.app.bridge.send(EngineCommand::Error {
                message: e.to_string(),
            }) {
                tracing::error!(error = %send_err, "Failed to report error to host");
            }
        }
    }

    pub async fn handle(&self, event: HostEvent) -> Result<(), HandlerError> {
        let bridge = &self.app.bridge;
        match event {
            HostEvent::Ready { user_id, is_gm } => {
                tracing::info!(user_id = %user_id, is_gm, "Host session ready");
                self.app
                    .session
                    .set_user(SessionUser {
                        user_id: UserId::new(user_id),
                        is_gm,
                    })
                    .await;
                self.reconcile_once().await?;
            }
            HostEvent::SceneSnapshot { scene_id, tokens } => {
                bridge
                    .replace_scene(
                        scene_id.map(SceneId::new),
                        tokens.into_iter().map(token_from_data).collect(),
                    )
                    .await;
                self.reconcile_once().await?;
            }
            HostEvent::TokenUpdated { token } => {
                bridge.upsert_token(token_from_data(token)).await;
            }
            HostEvent::TokenRemoved { token_id } => {
                bridge.remove_token(&TokenId::new(token_id)).await;
            }
            HostEvent::SelectionChanged { token_ids } => {
                bridge
                    .set_selection(token_ids.into_iter().map(TokenId::new).collect())
                    .await;
            }
            HostEvent::FormAction {
                action,
                condition_id,
            } => {
                let user = self.user().await?;
                let outcome = self
                    .app
                    .use_cases
                    .conditions
                    .form
                    .handle_action(&user.user_id, &action, condition_id.as_deref())
                    .await?;
                tracing::debug!(action = %action, ?outcome, "Form action handled");
                self.send_condition_list(&user.user_id).await?;
            }
            HostEvent::FormSubmit { data } => {
                let user = self.user().await?;
                self.app
                    .use_cases
                    .conditions
                    .form
                    .submit(&user.user_id, data)
                    .await?;
                self.send_condition_list(&user.user_id).await?;
            }
            HostEvent::UpdateCondition {
                condition_id,
                label,
                description,
            } => {
                let user = self.user().await?;
                let condition_id: ConditionId = condition_id.parse()?;
                let patch = ConditionPatch { label, description };
                self.app
                    .use_cases
                    .conditions
                    .form
                    .update(&user.user_id, condition_id, patch)
                    .await?;
                self.send_condition_list(&user.user_id).await?;
            }
            HostEvent::TurnChanged {
                current_token_id,
                combatants,
            } => {
                let user = self.user().await?;
                let change = turn_change_from_data(current_token_id, combatants);
                let outcome = self
                    .app
                    .use_cases
                    .combat
                    .announce_turn
                    .execute(&user.user_id, change)
                    .await?;
                if let TurnOutcome::Announced(ids) = &outcome {
                    tracing::debug!(count = ids.len(), "Turn announcements sent");
                }
            }
            HostEvent::CombatEnded => {
                self.app.use_cases.combat.announce_turn.reset().await;
            }
            HostEvent::DismissClicked {
                condition_id,
                token_id,
                message_id,
            } => {
                let user = self.user().await?;
                let condition_id: ConditionId = condition_id.parse()?;
                let message_id = message_id.map(ChatMessageId::new);
                self.app
                    .use_cases
                    .combat
                    .dismiss
                    .execute(
                        &user.user_id,
                        condition_id,
                        &TokenId::new(token_id),
                        message_id.as_ref(),
                    )
                    .await?;
            }
            HostEvent::Localization { entries } => {
                self.app.localization.extend(string_entries(entries));
            }
            HostEvent::Unknown => {
                tracing::warn!("Ignoring unknown host event type");
            }
        }
        Ok(())
    }

    async fn user(&self) -> Result<SessionUser, HandlerError> {
        self.app.session.user().await.ok_or(HandlerError::NotReady)
    }

    /// Runs once both the GM session and the scene are known, whichever arrives last.
    async fn reconcile_once(&self) -> Result<(), HandlerError> {
        if !self.app.bridge.scene_loaded().await {
            return Ok(());
        }
        let outcome = self
            .app
            .use_cases
            .session
            .reconcile_indicators
            .execute()
            .await?;
        if let ReconcileOutcome::Reconciled(report) = outcome {
            tracing::debug!(corrected = report.corrected.len(), "Startup reconciliation ran");
        }
        Ok(())
    }

    async fn send_condition_list(&self, user_id: &UserId) -> Result<(), HandlerError> {
        let conditions = self.app.use_cases.conditions.form.view(user_id).await?;
        self.app.bridge.send(EngineCommand::ConditionList {
            conditions: conditions.iter().map(condition_to_data).collect(),
        })?;
        Ok(())
    }
}

fn string_entries(entries: Map<String, Value>) -> Vec<(String, String)> {
    entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            _ => None,
        })
        .collect()
}
