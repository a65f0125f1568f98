//! Turn announcements.
//!
//! Hosts fire a turn-change while the combat UI initializes and may repeat
//! one for the same token; neither produces reminders. A genuine new turn
//! posts one chat card per condition on the active token.

use std::sync::Arc;

use condition_reminders_domain::{
    Announcement, ChatMessageId, TurnChange, TurnObservation, TurnTracker, UserId,
};
use handlebars::Handlebars;
use serde_json::json;
use tokio::sync::Mutex;

use crate::entities::Conditions;
use crate::infrastructure::localization::keys;
use crate::infrastructure::ports::{
    ChatMessage, ChatPort, ChatSpeaker, ClockPort, HostError, LocalizationPort, RepoError,
    SceneGraphPort, TokenSnapshot,
};

const ANNOUNCEMENT_TEMPLATE: &str = r#"<div class="condition-reminders-card" data-condition-id="{{condition_id}}" data-token-id="{{token_id}}">
  <h3 class="condition-reminders-label">{{label}}</h3>
  <p class="condition-reminders-description">{{description}}</p>
  <button type="button" class="condition-reminders-dismiss" data-action="dismiss" data-condition-id="{{condition_id}}" data-token-id="{{token_id}}" title="{{end_condition}}">{{end_condition}}</button>
</div>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// First change of a combat; only recorded
    Initialized,
    /// Same token as the previous change
    Repeated,
    /// Reminders are switched off in settings
    Disabled,
    /// No placed token could be found for the active combatant
    NoToken,
    /// One message per bound condition, in registry order
    Announced(Vec<ChatMessageId>),
}

#[derive(Debug, thiserror::Error)]
pub enum AnnounceError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("Failed to render announcement: {0}")]
    Template(String),
}

/// Use case that posts condition reminders when a turn starts.
pub struct AnnounceTurn {
    conditions: Arc<Conditions>,
    scene: Arc<dyn SceneGraphPort>,
    chat: Arc<dyn ChatPort>,
    localization: Arc<dyn LocalizationPort>,
    clock: Arc<dyn ClockPort>,
    tracker: Mutex<TurnTracker>,
    handlebars: Handlebars<'static>,
    enabled: bool,
}

impl AnnounceTurn {
    pub fn new(
        conditions: Arc<Conditions>,
        scene: Arc<dyn SceneGraphPort>,
        chat: Arc<dyn ChatPort>,
        localization: Arc<dyn LocalizationPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            conditions,
            scene,
            chat,
            localization,
            clock,
            tracker: Mutex::new(TurnTracker::new()),
            handlebars: Handlebars::new(),
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        change: TurnChange,
    ) -> Result<TurnOutcome, AnnounceError> {
        let observation = self
            .tracker
            .lock()
            .await
            .observe(change.current_token_id.as_ref());

        match observation {
            TurnObservation::Initialized => {
                tracing::debug!("Turn tracking started");
                return Ok(TurnOutcome::Initialized);
            }
            TurnObservation::Repeated => return Ok(TurnOutcome::Repeated),
            TurnObservation::Advanced(_) => {}
        }

        if !self.enabled {
            return Ok(TurnOutcome::Disabled);
        }

        let Some(token) = self.resolve_token(&change).await? else {
            tracing::debug!(token_id = ?change.current_token_id, "No placed token for active combatant");
            return Ok(TurnOutcome::NoToken);
        };

        let conditions = self
            .conditions
            .conditions_for_token(user_id, &token.id)
            .await?;
        if conditions.is_empty() {
            return Ok(TurnOutcome::Announced(Vec::new()));
        }

        let speaker = self.speaker_for(&change, &token).await?;
        let end_condition = self.localization.localize(keys::END_CONDITION);

        let mut posted = Vec::with_capacity(conditions.len());
        for condition in &conditions {
            let announcement = Announcement::for_condition(condition, &token.id);
            let content = self.render(&announcement, &end_condition)?;
            let message_id = self
                .chat
                .post(ChatMessage {
                    author: user_id.clone(),
                    speaker: speaker.clone(),
                    content,
                    timestamp: self.clock.now(),
                })
                .await?;
            posted.push(message_id);
        }

        tracing::info!(
            token_id = %token.id,
            announcements = posted.len(),
            "Turn reminders posted"
        );
        Ok(TurnOutcome::Announced(posted))
    }

    /// Forget the current combat; the next change initializes again.
    pub async fn reset(&self) {
        self.tracker.lock().await.reset();
    }

    pub async fn tracker(&self) -> TurnTracker {
        self.tracker.lock().await.clone()
    }

    /// The referenced token when it's placed, else the first placed token of
    /// the active combatant's actor.
    async fn resolve_token(
        &self,
        change: &TurnChange,
    ) -> Result<Option<TokenSnapshot>, HostError> {
        if let Some(token_id) = &change.current_token_id {
            if let Some(token) = self.scene.token(token_id).await? {
                return Ok(Some(token));
            }
        }

        let Some(actor_id) = change.active_combatant().and_then(|c| c.actor_id.as_ref()) else {
            return Ok(None);
        };
        Ok(self
            .scene
            .tokens()
            .await?
            .into_iter()
            .find(|t| t.actor_id.as_ref() == Some(actor_id)))
    }

    async fn speaker_for(
        &self,
        change: &TurnChange,
        token: &TokenSnapshot,
    ) -> Result<ChatSpeaker, HostError> {
        let combatant = change.active_combatant();
        let alias = combatant
            .map(|c| c.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| token.name.clone());

        Ok(ChatSpeaker {
            actor_id: combatant
                .and_then(|c| c.actor_id.clone())
                .or_else(|| token.actor_id.clone()),
            alias,
            scene_id: self.scene.active_scene().await?,
            token_id: Some(token.id.clone()),
        })
    }

    fn render(
        &self,
        announcement: &Announcement,
        end_condition: &str,
    ) -> Result<String, AnnounceError> {
        let data = json!({
            "condition_id": announcement.condition_id.to_string(),
            "token_id": announcement.token_id.to_string(),
            "label": announcement.label,
            "description": announcement.description,
            "end_condition": end_condition,
        });
        self.handlebars
            .render_template(ANNOUNCEMENT_TEMPLATE, &data)
            .map_err(|e| AnnounceError::Template(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockChatPort;
    use crate::test_fixtures::{gm, TestHarness};
    use condition_reminders_domain::{ActorId, Combatant, ConditionDraft, TokenId};
    use condition_reminders_shared::EngineCommand;

    fn turn(token: Option<&str>) -> TurnChange {
        TurnChange {
            current_token_id: token.map(TokenId::new),
            combatants: vec![
                Combatant {
                    id: None,
                    actor_id: Some(ActorId::new("goblin")),
                    token_id: Some(TokenId::new("tok1")),
                    name: "Goblin".into(),
                },
                Combatant {
                    id: None,
                    actor_id: Some(ActorId::new("orc")),
                    token_id: Some(TokenId::new("tok2")),
                    name: String::new(),
                },
            ],
        }
    }

    async fn harness_with_conditions_on(token: &str, labels: &[&str]) -> TestHarness {
        let harness = TestHarness::new();
        harness
            .place_tokens(vec![
                TokenSnapshot::new("tok1")
                    .with_name("Goblin")
                    .with_actor("goblin"),
                TokenSnapshot::new("tok2")
                    .with_name("Orc Token")
                    .with_actor("orc"),
            ])
            .await;
        let conditions = &harness.app.entities.conditions;
        for label in labels {
            let c = conditions
                .create(
                    &gm(),
                    ConditionDraft::new()
                        .with_label(*label)
                        .with_description(format!("{} effect", label)),
                )
                .await
                .unwrap();
            conditions
                .add_binding(&gm(), c.id(), &TokenId::new(token))
                .await
                .unwrap();
        }
        harness
    }

    #[tokio::test]
    async fn test_first_change_only_initializes() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned"]).await;
        harness.drain();
        let announce = &harness.app.use_cases.combat.announce_turn;

        let outcome = announce.execute(&gm(), turn(Some("tok1"))).await.unwrap();

        assert_eq!(outcome, TurnOutcome::Initialized);
        assert!(announce.tracker().await.is_tracking());
        assert!(harness.drain().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_token_is_skipped() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned"]).await;
        let announce = &harness.app.use_cases.combat.announce_turn;

        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();
        let outcome = announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();

        assert_eq!(outcome, TurnOutcome::Repeated);
    }

    #[tokio::test]
    async fn test_new_turn_posts_one_card_per_condition_in_order() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned", "Prone"]).await;
        let announce = &harness.app.use_cases.combat.announce_turn;

        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();
        harness.drain();
        let outcome = announce.execute(&gm(), turn(Some("tok1"))).await.unwrap();

        let TurnOutcome::Announced(ids) = outcome else {
            panic!("expected Announced");
        };
        assert_eq!(ids.len(), 2);

        let posts: Vec<_> = harness
            .drain()
            .into_iter()
            .filter_map(|c| match c {
                EngineCommand::PostChat { message } => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(posts.len(), 2);
        assert!(posts[0].content.contains("Poisoned"));
        assert!(posts[0].content.contains("Poisoned effect"));
        assert!(posts[1].content.contains("Prone"));
        assert!(posts[0].content.contains(r#"data-token-id="tok1""#));
        assert!(posts[0].content.contains("End Condition"));
        assert_eq!(posts[0].speaker.alias, "Goblin");
        assert_eq!(posts[0].speaker.actor.as_deref(), Some("goblin"));
        assert_eq!(posts[0].user, "gm");
    }

    #[tokio::test]
    async fn test_unnamed_combatant_falls_back_to_token_name() {
        let harness = harness_with_conditions_on("tok2", &["Dazed"]).await;
        let announce = &harness.app.use_cases.combat.announce_turn;

        announce.execute(&gm(), turn(Some("tok1"))).await.unwrap();
        harness.drain();
        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();

        let Some(EngineCommand::PostChat { message }) = harness.drain().into_iter().next() else {
            panic!("expected PostChat");
        };
        assert_eq!(message.speaker.alias, "Orc Token");
    }

    #[tokio::test]
    async fn test_unplaced_token_resolves_through_actor() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned"]).await;
        let announce = &harness.app.use_cases.combat.announce_turn;

        let mut change = turn(Some("stale"));
        change.combatants[0].token_id = Some(TokenId::new("stale"));

        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();
        harness.drain();
        let outcome = announce.execute(&gm(), change).await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Announced(ref ids) if ids.len() == 1));
    }

    #[tokio::test]
    async fn when_no_token_resolves_then_nothing_posted() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned"]).await;
        let announce = &harness.app.use_cases.combat.announce_turn;

        announce.execute(&gm(), turn(Some("tok1"))).await.unwrap();
        harness.drain();
        let outcome = announce
            .execute(&gm(), turn(Some("nowhere")))
            .await
            .unwrap();

        assert_eq!(outcome, TurnOutcome::NoToken);
        assert!(harness.drain().is_empty());
    }

    #[tokio::test]
    async fn test_labels_are_html_escaped() {
        let harness =
            harness_with_conditions_on("tok1", &["<script>alert(1)</script>"]).await;
        let announce = &harness.app.use_cases.combat.announce_turn;

        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();
        harness.drain();
        announce.execute(&gm(), turn(Some("tok1"))).await.unwrap();

        let Some(EngineCommand::PostChat { message }) = harness.drain().into_iter().next() else {
            panic!("expected PostChat");
        };
        assert!(!message.content.contains("<script>"));
        assert!(message.content.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_reset_restarts_initialization() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned"]).await;
        let announce = &harness.app.use_cases.combat.announce_turn;

        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();
        announce.reset().await;
        let outcome = announce.execute(&gm(), turn(Some("tok1"))).await.unwrap();

        assert_eq!(outcome, TurnOutcome::Initialized);
    }

    #[tokio::test]
    async fn when_disabled_then_tracks_but_posts_nothing() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned"]).await;
        let mut chat = MockChatPort::new();
        chat.expect_post().never();
        let announce = AnnounceTurn::new(
            harness.app.entities.conditions.clone(),
            harness.app.bridge.clone(),
            Arc::new(chat),
            harness.app.localization.clone(),
            harness.clock(),
        )
        .with_enabled(false);

        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();
        let outcome = announce.execute(&gm(), turn(Some("tok1"))).await.unwrap();

        assert_eq!(outcome, TurnOutcome::Disabled);
    }

    #[tokio::test]
    async fn when_chat_fails_then_returns_host_error() {
        let harness = harness_with_conditions_on("tok1", &["Poisoned"]).await;
        let mut chat = MockChatPort::new();
        chat.expect_post()
            .returning(|_| Err(HostError::unavailable("closed")));
        let announce = AnnounceTurn::new(
            harness.app.entities.conditions.clone(),
            harness.app.bridge.clone(),
            Arc::new(chat),
            harness.app.localization.clone(),
            harness.clock(),
        );

        announce.execute(&gm(), turn(Some("tok2"))).await.unwrap();
        let err = announce
            .execute(&gm(), turn(Some("tok1")))
            .await
            .unwrap_err();

        assert!(matches!(err, AnnounceError::Host(HostError::Unavailable(_))));
    }
}
