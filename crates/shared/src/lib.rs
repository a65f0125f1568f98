//! Condition Reminders Protocol - Shared types for the host bridge
//!
//! This crate contains the types exchanged between a virtual tabletop host
//! plugin and the engine process:
//! - `messages` - `HostEvent` (host → engine) and `EngineCommand` (engine → host)
//! - `dto` - wire-format records carried by those messages
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - host and condition ids travel as plain strings
//! 4. **One message per line** - every message is a single JSON object

pub mod dto;
pub mod messages;

pub use dto::{
    ChatMessageData, ChatSpeakerData, CombatantData, ConditionData, NotificationLevel, TokenData,
};
pub use messages::{EngineCommand, HostEvent};
