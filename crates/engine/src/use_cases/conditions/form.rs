use std::str::FromStr;
use std::sync::Arc;

use condition_reminders_domain::common::expand_object;
use condition_reminders_domain::{Condition, ConditionDraft, ConditionId, ConditionPatch, UserId};
use serde_json::{Map, Value};

use crate::entities::{ConditionError, Conditions, DeleteOutcome, ToggleOutcome, UpdateOutcome};
use crate::infrastructure::localization::keys;
use crate::infrastructure::ports::{LocalizationPort, NotificationLevel, NotificationPort};

/// Buttons on the condition list form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Delete,
    Toggle,
}

impl FromStr for FormAction {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "delete" => Ok(Self::Delete),
            "toggle" => Ok(Self::Toggle),
            other => Err(FormError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Created(Condition),
    Deleted(DeleteOutcome),
    Toggled(ToggleOutcome),
    /// The action's precondition failed; the user was notified
    Rejected,
    /// Unknown action or unusable condition id
    Ignored,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Unknown form action: {0}")]
    UnknownAction(String),
    #[error(transparent)]
    Condition(#[from] ConditionError),
}

/// Use case backing the condition list form.
pub struct ConditionForm {
    conditions: Arc<Conditions>,
    notifications: Arc<dyn NotificationPort>,
    localization: Arc<dyn LocalizationPort>,
    default_label: String,
    default_description: String,
}

impl ConditionForm {
    pub fn new(
        conditions: Arc<Conditions>,
        notifications: Arc<dyn NotificationPort>,
        localization: Arc<dyn LocalizationPort>,
    ) -> Self {
        Self {
            conditions,
            notifications,
            localization,
            default_label: condition_reminders_domain::DEFAULT_LABEL.to_string(),
            default_description: condition_reminders_domain::DEFAULT_DESCRIPTION.to_string(),
        }
    }

    /// Text for conditions created from the form.
    pub fn with_defaults(
        mut self,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.default_label = label.into();
        self.default_description = description.into();
        self
    }

    pub async fn handle_action(
        &self,
        user_id: &UserId,
        action: &str,
        condition_id: Option<&str>,
    ) -> Result<FormOutcome, FormError> {
        let action = match action.parse::<FormAction>() {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring form action");
                return Ok(FormOutcome::Ignored);
            }
        };

        match action {
            FormAction::Create => {
                let draft = ConditionDraft::new()
                    .with_label(self.default_label.clone())
                    .with_description(self.default_description.clone());
                let condition = self.conditions.create(user_id, draft).await?;
                Ok(FormOutcome::Created(condition))
            }
            FormAction::Delete => {
                let Some(condition_id) = parse_condition_id(action, condition_id) else {
                    return Ok(FormOutcome::Ignored);
                };
                Ok(FormOutcome::Deleted(
                    self.conditions.delete(user_id, condition_id).await?,
                ))
            }
            FormAction::Toggle => {
                let Some(condition_id) = parse_condition_id(action, condition_id) else {
                    return Ok(FormOutcome::Ignored);
                };
                match self.conditions.toggle_membership(user_id, condition_id).await {
                    Ok(outcome) => Ok(FormOutcome::Toggled(outcome)),
                    Err(ConditionError::NoTokensSelected) => {
                        self.notify_no_selection().await;
                        Ok(FormOutcome::Rejected)
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Apply a raw form submission with dotted keys (`"<id>.label"`).
    pub async fn submit(
        &self,
        user_id: &UserId,
        data: Map<String, Value>,
    ) -> Result<(), FormError> {
        let expanded = expand_object(data);
        self.conditions.update_all(user_id, expanded).await?;
        Ok(())
    }

    pub async fn update(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
        patch: ConditionPatch,
    ) -> Result<UpdateOutcome, FormError> {
        Ok(self.conditions.update(user_id, condition_id, patch).await?)
    }

    /// Conditions to render, in registry order.
    pub async fn view(&self, user_id: &UserId) -> Result<Vec<Condition>, FormError> {
        Ok(self
            .conditions
            .list(user_id)
            .await
            .map_err(ConditionError::from)?)
    }

    async fn notify_no_selection(&self) {
        let message = self.localization.localize(keys::NO_SELECTION);
        if let Err(e) = self
            .notifications
            .notify(NotificationLevel::Error, &message)
            .await
        {
            tracing::warn!(error = %e, "Failed to show notification");
        }
    }
}

fn parse_condition_id(action: FormAction, raw: Option<&str>) -> Option<ConditionId> {
    let Some(raw) = raw else {
        tracing::warn!(?action, "Form action without a condition id");
        return None;
    };
    match raw.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(condition_id = %raw, error = %e, "Malformed condition id");
            None
        }
    }
}
