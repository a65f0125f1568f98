//! Data carried across the host ports.

use chrono::{DateTime, Utc};
use condition_reminders_domain::{ActorId, SceneId, TokenId, UserId};

/// A token as the host currently displays it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSnapshot {
    pub id: TokenId,
    pub name: String,
    pub actor_id: Option<ActorId>,
    /// Whether the condition indicator icon is currently shown
    pub has_indicator: bool,
}

impl TokenSnapshot {
    pub fn new(id: impl Into<TokenId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            actor_id: None,
            has_indicator: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_actor(mut self, actor_id: impl Into<ActorId>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_indicator(mut self, has_indicator: bool) -> Self {
        self.has_indicator = has_indicator;
        self
    }
}

/// Identity a chat message is spoken as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSpeaker {
    pub actor_id: Option<ActorId>,
    /// Name shown in the chat log
    pub alias: String,
    pub scene_id: Option<SceneId>,
    pub token_id: Option<TokenId>,
}

/// A structured entry for the shared chat log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: UserId,
    pub speaker: ChatSpeaker,
    /// HTML body
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}
