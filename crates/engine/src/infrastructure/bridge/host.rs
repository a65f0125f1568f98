//! Port implementations backed by the host plugin.

use std::sync::Arc;

use async_trait::async_trait;
use condition_reminders_domain::{ChatMessageId, SceneId, TokenId};
use condition_reminders_shared::EngineCommand;
use tokio::sync::{mpsc, RwLock};

use super::convert::{chat_message_to_data, notification_level_to_data};
use crate::infrastructure::ports::{
    ChatMessage, ChatPort, HostError, NotificationLevel, NotificationPort, RandomPort,
    SceneGraphPort, SelectionPort, TokenSnapshot,
};

/// Engine-side copy of the host state the ports read.
#[derive(Debug, Default, Clone)]
pub struct HostMirror {
    pub scene_id: Option<SceneId>,
    pub tokens: Vec<TokenSnapshot>,
    pub selection: Vec<TokenId>,
    /// Set once the host has sent a full scene snapshot
    pub scene_loaded: bool,
}

/// Scene graph, selection, chat and notification ports over the host bridge.
pub struct HostBridge {
    mirror: RwLock<HostMirror>,
    outbox: mpsc::UnboundedSender<EngineCommand>,
    random: Arc<dyn RandomPort>,
}

impl HostBridge {
    pub fn new(outbox: mpsc::UnboundedSender<EngineCommand>, random: Arc<dyn RandomPort>) -> Self {
        Self {
            mirror: RwLock::new(HostMirror::default()),
            outbox,
            random,
        }
    }

    /// Bridge plus the receiving end of its outbox.
    pub fn channel(random: Arc<dyn RandomPort>) -> (Self, mpsc::UnboundedReceiver<EngineCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx, random), rx)
    }

    /// Queue a command for the host.
    pub fn send(&self, command: EngineCommand) -> Result<(), HostError> {
        self.outbox
            .send(command)
            .map_err(|_| HostError::unavailable("host bridge closed"))
    }

    // =========================================================================
    // Mirror updates (driven by host events)
    // =========================================================================

    /// Replace the mirrored scene wholesale.
    pub async fn replace_scene(&self, scene_id: Option<SceneId>, tokens: Vec<TokenSnapshot>) {
        let mut mirror = self.mirror.write().await;
        mirror.scene_id = scene_id;
        mirror.tokens = tokens;
        mirror.scene_loaded = true;
    }

    pub async fn scene_loaded(&self) -> bool {
        self.mirror.read().await.scene_loaded
    }

    pub async fn upsert_token(&self, token: TokenSnapshot) {
        let mut mirror = self.mirror.write().await;
        match mirror.tokens.iter_mut().find(|t| t.id == token.id) {
            Some(existing) => *existing = token,
            None => mirror.tokens.push(token),
        }
    }

    pub async fn remove_token(&self, token_id: &TokenId) {
        let mut mirror = self.mirror.write().await;
        mirror.tokens.retain(|t| &t.id != token_id);
        mirror.selection.retain(|t| t != token_id);
    }

    pub async fn set_selection(&self, token_ids: Vec<TokenId>) {
        self.mirror.write().await.selection = token_ids;
    }

    pub async fn snapshot(&self) -> HostMirror {
        self.mirror.read().await.clone()
    }
}

#[async_trait]
impl SceneGraphPort for HostBridge {
    async fn active_scene(&self) -> Result<Option<SceneId>, HostError> {
        Ok(self.mirror.read().await.scene_id.clone())
    }

    async fn tokens(&self) -> Result<Vec<TokenSnapshot>, HostError> {
        Ok(self.mirror.read().await.tokens.clone())
    }

    async fn token(&self, token_id: &TokenId) -> Result<Option<TokenSnapshot>, HostError> {
        Ok(self
            .mirror
            .read()
            .await
            .tokens
            .iter()
            .find(|t| &t.id == token_id)
            .cloned())
    }

    async fn toggle_indicator(&self, token_id: &TokenId, icon: &str) -> Result<(), HostError> {
        let mut mirror = self.mirror.write().await;
        let token = mirror
            .tokens
            .iter_mut()
            .find(|t| &t.id == token_id)
            .ok_or_else(|| {
                HostError::rejected(
                    "toggle_indicator",
                    format!("token {} is not on the active scene", token_id),
                )
            })?;

        self.send(EngineCommand::ToggleIndicator {
            token_id: token_id.to_string(),
            icon: icon.to_string(),
        })?;
        // The host reports the same state back on its next update
        token.has_indicator = !token.has_indicator;
        Ok(())
    }
}

#[async_trait]
impl SelectionPort for HostBridge {
    async fn selected_tokens(&self) -> Result<Vec<TokenId>, HostError> {
        Ok(self.mirror.read().await.selection.clone())
    }
}

#[async_trait]
impl ChatPort for HostBridge {
    async fn post(&self, message: ChatMessage) -> Result<ChatMessageId, HostError> {
        let id = ChatMessageId::new(self.random.gen_uuid().simple().to_string());
        self.send(EngineCommand::PostChat {
            message: chat_message_to_data(&id, &message),
        })?;
        Ok(id)
    }

    async fn acknowledge(&self, message_id: &ChatMessageId) -> Result<(), HostError> {
        self.send(EngineCommand::AcknowledgeChat {
            message_id: message_id.to_string(),
        })
    }
}

#[async_trait]
impl NotificationPort for HostBridge {
    async fn notify(&self, level: NotificationLevel, message: &str) -> Result<(), HostError> {
        self.send(EngineCommand::Notify {
            level: notification_level_to_data(level),
            message: message.to_string(),
        })
    }
}
