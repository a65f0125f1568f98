//! Dismissing an announced condition from its chat card.

use std::sync::Arc;

use condition_reminders_domain::{ChatMessageId, ConditionId, TokenId, UserId};

use crate::entities::{BindingOutcome, ConditionError, Conditions};
use crate::infrastructure::ports::ChatPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissOutcome {
    pub binding: BindingOutcome,
    /// Whether the originating card's button was disabled
    pub acknowledged: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DismissError {
    #[error(transparent)]
    Condition(#[from] ConditionError),
}

/// Use case for the dismiss button on a turn reminder.
pub struct DismissCondition {
    conditions: Arc<Conditions>,
    chat: Arc<dyn ChatPort>,
}

impl DismissCondition {
    pub fn new(conditions: Arc<Conditions>, chat: Arc<dyn ChatPort>) -> Self {
        Self { conditions, chat }
    }

    /// Unbind the condition from the token, then acknowledge the card.
    ///
    /// The card is acknowledged even when the binding was already gone.
    pub async fn execute(
        &self,
        user_id: &UserId,
        condition_id: ConditionId,
        token_id: &TokenId,
        message_id: Option<&ChatMessageId>,
    ) -> Result<DismissOutcome, DismissError> {
        let binding = self
            .conditions
            .remove_binding(user_id, condition_id, token_id)
            .await?;

        let acknowledged = match message_id {
            Some(message_id) => match self.chat.acknowledge(message_id).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(message_id = %message_id, error = %e, "Failed to acknowledge reminder");
                    false
                }
            },
            None => false,
        };

        tracing::info!(
            condition_id = %condition_id,
            token_id = %token_id,
            ?binding,
            "Condition dismissed"
        );
        Ok(DismissOutcome {
            binding,
            acknowledged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{HostError, MockChatPort, TokenSnapshot};
    use crate::test_fixtures::{gm, TestHarness};
    use condition_reminders_domain::ConditionDraft;
    use condition_reminders_shared::EngineCommand;

    #[tokio::test]
    async fn test_dismiss_unbinds_and_acknowledges() {
        let harness = TestHarness::new();
        harness.place_tokens(vec![TokenSnapshot::new("tok1")]).await;
        let conditions = &harness.app.entities.conditions;
        let c = conditions
            .create(&gm(), ConditionDraft::new())
            .await
            .unwrap();
        conditions
            .add_binding(&gm(), c.id(), &TokenId::new("tok1"))
            .await
            .unwrap();
        harness.drain();

        let outcome = harness
            .app
            .use_cases
            .combat
            .dismiss
            .execute(
                &gm(),
                c.id(),
                &TokenId::new("tok1"),
                Some(&ChatMessageId::new("m1")),
            )
            .await
            .unwrap();

        assert_eq!(outcome.binding, BindingOutcome::Removed { token_count: 0 });
        assert!(outcome.acknowledged);
        let commands = harness.drain();
        assert!(commands.contains(&EngineCommand::AcknowledgeChat {
            message_id: "m1".into()
        }));
        assert!(commands.iter().any(|c| matches!(
            c,
            EngineCommand::ToggleIndicator { token_id, .. } if token_id == "tok1"
        )));
    }

    #[tokio::test]
    async fn when_binding_already_gone_then_still_acknowledges() {
        let harness = TestHarness::new();
        let c = harness
            .app
            .entities
            .conditions
            .create(&gm(), ConditionDraft::new())
            .await
            .unwrap();

        let mut chat = MockChatPort::new();
        chat.expect_acknowledge()
            .withf(|id| id.as_str() == "m1")
            .times(1)
            .returning(|_| Ok(()));
        let dismiss =
            DismissCondition::new(harness.app.entities.conditions.clone(), Arc::new(chat));

        let outcome = dismiss
            .execute(
                &gm(),
                c.id(),
                &TokenId::new("tok1"),
                Some(&ChatMessageId::new("m1")),
            )
            .await
            .unwrap();

        assert_eq!(outcome.binding, BindingOutcome::NotBound);
        assert!(outcome.acknowledged);
    }

    #[tokio::test]
    async fn when_acknowledge_fails_then_binding_change_stands() {
        let harness = TestHarness::new();
        harness.place_tokens(vec![TokenSnapshot::new("tok1")]).await;
        let conditions = harness.app.entities.conditions.clone();
        let c = conditions
            .create(&gm(), ConditionDraft::new())
            .await
            .unwrap();
        conditions
            .add_binding(&gm(), c.id(), &TokenId::new("tok1"))
            .await
            .unwrap();

        let mut chat = MockChatPort::new();
        chat.expect_acknowledge()
            .returning(|_| Err(HostError::unavailable("closed")));
        let dismiss = DismissCondition::new(conditions.clone(), Arc::new(chat));

        let outcome = dismiss
            .execute(
                &gm(),
                c.id(),
                &TokenId::new("tok1"),
                Some(&ChatMessageId::new("m1")),
            )
            .await
            .unwrap();

        assert!(!outcome.acknowledged);
        assert_eq!(
            conditions
                .count_for_token(&gm(), &TokenId::new("tok1"))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn when_no_message_id_then_nothing_acknowledged() {
        let harness = TestHarness::new();
        let mut chat = MockChatPort::new();
        chat.expect_acknowledge().never();
        let dismiss =
            DismissCondition::new(harness.app.entities.conditions.clone(), Arc::new(chat));

        let outcome = dismiss
            .execute(&gm(), ConditionId::new(), &TokenId::new("tok1"), None)
            .await
            .unwrap();

        assert_eq!(outcome.binding, BindingOutcome::ConditionMissing);
        assert!(!outcome.acknowledged);
    }
}
