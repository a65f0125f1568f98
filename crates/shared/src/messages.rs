//! Bridge message types for host-engine communication
//!
//! The host plugin writes `HostEvent`s to the engine's stdin and reads
//! `EngineCommand`s from its stdout, one JSON object per line.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown event types deserialize to `Unknown` for forward compatibility

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dto::{ChatMessageData, CombatantData, ConditionData, NotificationLevel, TokenData};

// =============================================================================
// Host Events (Host → Engine)
// =============================================================================

/// Events forwarded by the host plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum HostEvent {
    /// The host finished loading; identifies the acting user
    Ready { user_id: String, is_gm: bool },
    /// Full token list of the active scene
    SceneSnapshot {
        scene_id: Option<String>,
        tokens: Vec<TokenData>,
    },
    /// A token was created or changed on the active scene
    TokenUpdated { token: TokenData },
    /// A token left the active scene
    TokenRemoved { token_id: String },
    /// The user's token selection changed
    SelectionChanged { token_ids: Vec<String> },
    /// A button in the condition list form was clicked
    FormAction {
        action: String,
        #[serde(default)]
        condition_id: Option<String>,
    },
    /// The condition list form was submitted (flat, dot-delimited keys)
    FormSubmit { data: Map<String, Value> },
    /// Direct edit of one condition's text
    UpdateCondition {
        condition_id: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    /// The combat tracker moved to another turn
    TurnChanged {
        #[serde(default)]
        current_token_id: Option<String>,
        #[serde(default)]
        combatants: Vec<CombatantData>,
    },
    /// The active combat ended
    CombatEnded,
    /// The dismiss button on an announcement was clicked
    DismissClicked {
        condition_id: String,
        token_id: String,
        #[serde(default)]
        message_id: Option<String>,
    },
    /// Localized strings keyed by translation key
    Localization { entries: Map<String, Value> },

    /// Unknown event type for forward compatibility
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Engine Commands (Engine → Host)
// =============================================================================

/// Commands the host plugin carries out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum EngineCommand {
    /// Flip the indicator icon on a token
    ToggleIndicator { token_id: String, icon: String },
    /// Append a message to the chat log
    PostChat { message: ChatMessageData },
    /// Disable the dismiss button of a posted message
    AcknowledgeChat { message_id: String },
    /// Show a toast notification
    Notify {
        level: NotificationLevel,
        message: String,
    },
    /// Current conditions, for re-rendering the form
    ConditionList { conditions: Vec<ConditionData> },
    /// An event could not be processed
    Error { message: String },
}
