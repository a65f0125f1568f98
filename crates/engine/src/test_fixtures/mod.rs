//! Test fixtures and a composed in-memory engine.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{gm, TestHarness};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let harness = TestHarness::new();
//!     harness.place_tokens(vec![TokenSnapshot::new("tok1")]).await;
//!     // ... drive harness.app, then inspect harness.drain()
//! }
//! ```

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use condition_reminders_domain::{TokenId, UserId};
use condition_reminders_shared::EngineCommand;
use tokio::sync::mpsc;

use crate::api::HostEventHandler;
use crate::app::App;
use crate::infrastructure::app_settings::EngineSettings;
use crate::infrastructure::bridge::HostBridge;
use crate::infrastructure::clock::{FixedClock, SequentialRandom};
use crate::infrastructure::flag_store::InMemoryFlagStore;
use crate::infrastructure::ports::{ClockPort, TokenSnapshot};
use crate::stores::SessionUser;

/// The GM user most tests act as.
pub fn gm() -> UserId {
    UserId::new("gm")
}

/// Engine wired to in-memory flags and a real host bridge.
///
/// Commands the engine sends to the host are buffered until drained.
pub struct TestHarness {
    pub app: Arc<App>,
    clock: Arc<dyn ClockPort>,
    commands: Mutex<Option<mpsc::UnboundedReceiver<EngineCommand>>>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .expect("valid fixed time"),
        ));
        let (bridge, commands) = HostBridge::channel(Arc::new(SequentialRandom::new()));
        let app = App::new(
            settings,
            Arc::new(InMemoryFlagStore::new()),
            Arc::new(bridge),
            clock.clone(),
            Arc::new(SequentialRandom::new()),
        );

        Self {
            app: Arc::new(app),
            clock,
            commands: Mutex::new(Some(commands)),
        }
    }

    pub fn handler(&self) -> HostEventHandler {
        HostEventHandler::new(self.app.clone())
    }

    pub fn clock(&self) -> Arc<dyn ClockPort> {
        self.clock.clone()
    }

    /// Every command sent since the last drain, in order.
    pub fn drain(&self) -> Vec<EngineCommand> {
        let mut guard = self.commands.lock().expect("commands lock");
        let Some(rx) = guard.as_mut() else {
            return Vec::new();
        };
        let mut drained = Vec::new();
        while let Ok(command) = rx.try_recv() {
            drained.push(command);
        }
        drained
    }

    /// Hand the command receiver to a transport test.
    pub fn take_commands(&mut self) -> mpsc::UnboundedReceiver<EngineCommand> {
        self.commands
            .get_mut()
            .expect("commands lock")
            .take()
            .expect("commands already taken")
    }

    /// Indicator toggles sent since the last drain, by token id.
    pub fn drain_toggles(&self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|c| match c {
                EngineCommand::ToggleIndicator { token_id, .. } => Some(token_id),
                _ => None,
            })
            .collect()
    }

    pub async fn place_tokens(&self, tokens: Vec<TokenSnapshot>) {
        self.app.bridge.replace_scene(None, tokens).await;
    }

    pub async fn select(&self, token_ids: &[&str]) {
        self.app
            .bridge
            .set_selection(token_ids.iter().map(|t| TokenId::new(*t)).collect())
            .await;
    }

    pub async fn ready(&self, user_id: UserId, is_gm: bool) {
        self.app
            .session
            .set_user(SessionUser { user_id, is_gm })
            .await;
    }

    pub async fn indicator_shown(&self, token_id: &str) -> bool {
        self.app
            .bridge
            .snapshot()
            .await
            .tokens
            .iter()
            .any(|t| t.id.as_str() == token_id && t.has_indicator)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
