//! Conversions between wire DTOs and engine/domain types.

use condition_reminders_domain::{
    ActorId, ChatMessageId, Combatant, CombatantId, Condition, TokenId, TurnChange,
};
use condition_reminders_shared::{
    ChatMessageData, ChatSpeakerData, CombatantData, ConditionData, TokenData,
};

use crate::infrastructure::ports::{ChatMessage, NotificationLevel, TokenSnapshot};

pub fn token_from_data(data: TokenData) -> TokenSnapshot {
    TokenSnapshot {
        id: TokenId::new(data.id),
        name: data.name,
        actor_id: data.actor_id.map(ActorId::new),
        has_indicator: data.has_indicator,
    }
}

pub fn combatant_from_data(data: CombatantData) -> Combatant {
    Combatant {
        id: data.id.map(CombatantId::new),
        actor_id: data.actor_id.map(ActorId::new),
        token_id: data.token_id.map(TokenId::new),
        name: data.name,
    }
}

pub fn turn_change_from_data(
    current_token_id: Option<String>,
    combatants: Vec<CombatantData>,
) -> TurnChange {
    TurnChange {
        current_token_id: current_token_id.map(TokenId::new),
        combatants: combatants.into_iter().map(combatant_from_data).collect(),
    }
}

pub fn condition_to_data(condition: &Condition) -> ConditionData {
    ConditionData {
        id: condition.id().to_string(),
        label: condition.label().to_string(),
        description: condition.description().to_string(),
        user_id: condition.owner_id().to_string(),
        token_ids: condition
            .token_ids()
            .iter()
            .map(|t| t.to_string())
            .collect(),
    }
}

pub fn chat_message_to_data(id: &ChatMessageId, message: &ChatMessage) -> ChatMessageData {
    ChatMessageData {
        id: id.to_string(),
        user: message.author.to_string(),
        speaker: ChatSpeakerData {
            actor: message.speaker.actor_id.as_ref().map(|a| a.to_string()),
            alias: message.speaker.alias.clone(),
            scene: message.speaker.scene_id.as_ref().map(|s| s.to_string()),
            token: message.speaker.token_id.as_ref().map(|t| t.to_string()),
        },
        content: message.content.clone(),
        timestamp: message.timestamp.to_rfc3339(),
    }
}

pub fn notification_level_to_data(
    level: NotificationLevel,
) -> condition_reminders_shared::NotificationLevel {
    match level {
        NotificationLevel::Info => condition_reminders_shared::NotificationLevel::Info,
        NotificationLevel::Warning => condition_reminders_shared::NotificationLevel::Warning,
        NotificationLevel::Error => condition_reminders_shared::NotificationLevel::Error,
    }
}
