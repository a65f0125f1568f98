//! Host application port traits (scene graph, selection, chat, notifications).

use async_trait::async_trait;
use condition_reminders_domain::{ChatMessageId, SceneId, TokenId};

use super::error::HostError;
use super::types::{ChatMessage, NotificationLevel, TokenSnapshot};

// =============================================================================
// Scene Graph
// =============================================================================

/// Tokens on the host's active scene.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SceneGraphPort: Send + Sync {
    async fn active_scene(&self) -> Result<Option<SceneId>, HostError>;

    /// Every token on the active scene.
    async fn tokens(&self) -> Result<Vec<TokenSnapshot>, HostError>;

    async fn token(&self, token_id: &TokenId) -> Result<Option<TokenSnapshot>, HostError>;

    /// Flip the named indicator icon on a token.
    ///
    /// The host primitive inverts whatever is displayed; callers decide
    /// whether a flip is needed.
    async fn toggle_indicator(&self, token_id: &TokenId, icon: &str) -> Result<(), HostError>;
}

// =============================================================================
// Selection
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectionPort: Send + Sync {
    /// Tokens the acting user currently has selected.
    async fn selected_tokens(&self) -> Result<Vec<TokenId>, HostError>;
}

// =============================================================================
// Chat
// =============================================================================

/// Shared, append-only chat log visible to all participants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPort: Send + Sync {
    async fn post(&self, message: ChatMessage) -> Result<ChatMessageId, HostError>;

    /// Mark a posted message's action as used so it can't be repeated.
    async fn acknowledge(&self, message_id: &ChatMessageId) -> Result<(), HostError>;
}

// =============================================================================
// Notifications
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn notify(&self, level: NotificationLevel, message: &str) -> Result<(), HostError>;
}

// =============================================================================
// Localization
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait LocalizationPort: Send + Sync {
    /// Translated string for `key`, or the key itself when unknown.
    fn localize(&self, key: &str) -> String;
}
