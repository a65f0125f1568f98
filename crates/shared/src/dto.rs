//! Wire-format records.
//!
//! Field names are camelCase to match the host's JavaScript side.

use serde::{Deserialize, Serialize};

/// A token placed on the active scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub actor_id: Option<String>,
    /// Whether the token currently displays the condition indicator
    #[serde(default)]
    pub has_indicator: bool,
}

/// One entry of the turn order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// A condition as rendered by the host's condition list form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionData {
    pub id: String,
    pub label: String,
    pub description: String,
    pub user_id: String,
    pub token_ids: Vec<String>,
}

/// Who a chat message is spoken as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSpeakerData {
    pub actor: Option<String>,
    /// Display name the host shows for the message
    pub alias: String,
    pub scene: Option<String>,
    pub token: Option<String>,
}

/// A chat message to append to the shared log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageData {
    pub id: String,
    pub user: String,
    pub speaker: ChatSpeakerData,
    pub content: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}
