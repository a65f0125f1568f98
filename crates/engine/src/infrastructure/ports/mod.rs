//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Flag persistence (could swap SQLite -> host document storage)
//! - The host's scene graph, selection, chat log and notifications
//! - Localization lookups
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{HostError, RepoError};

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::FlagStore;

// =============================================================================
// Types from types module (re-export for visibility)
// =============================================================================
pub use types::{ChatMessage, ChatSpeaker, NotificationLevel, TokenSnapshot};

// =============================================================================
// Host Ports
// =============================================================================
pub use external::{ChatPort, LocalizationPort, NotificationPort, SceneGraphPort, SelectionPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{
    MockChatPort, MockNotificationPort, MockSceneGraphPort, MockSelectionPort,
};

#[cfg(test)]
pub use repos::MockFlagStore;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};
