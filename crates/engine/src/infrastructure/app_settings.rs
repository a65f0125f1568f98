//! Engine settings
//!
//! Every field has a default so an empty environment yields a working
//! engine. Values come from `CONDITION_REMINDERS_*` environment variables;
//! the binary loads a `.env` file first via `dotenvy`.
//!
//! | Variable                                   | Field               |
//! |--------------------------------------------|---------------------|
//! | `CONDITION_REMINDERS_NAMESPACE`            | `namespace`         |
//! | `CONDITION_REMINDERS_FLAG_KEY`             | `flag_key`          |
//! | `CONDITION_REMINDERS_ICON`                 | `indicator_icon`    |
//! | `CONDITION_REMINDERS_DEFAULT_LABEL`        | `default_label`     |
//! | `CONDITION_REMINDERS_DEFAULT_DESCRIPTION`  | `default_description` |
//! | `CONDITION_REMINDERS_DB`                   | `database_path`     |
//! | `CONDITION_REMINDERS_ANNOUNCE`             | `announce_turns`    |

use std::path::PathBuf;

use condition_reminders_domain::{DEFAULT_DESCRIPTION, DEFAULT_LABEL};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAMESPACE: &str = "condition-reminders";
pub const DEFAULT_FLAG_KEY: &str = "conditions";
pub const DEFAULT_INDICATOR_ICON: &str =
    "modules/condition-reminders/icons/Condition-Reminders-Icon.png";

const ENV_PREFIX: &str = "CONDITION_REMINDERS_";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_flag_key() -> String {
    DEFAULT_FLAG_KEY.to_string()
}

fn default_indicator_icon() -> String {
    DEFAULT_INDICATOR_ICON.to_string()
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_true() -> bool {
    true
}

/// Runtime configuration for the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Flag namespace the registry is stored under
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Flag key holding the registry document
    #[serde(default = "default_flag_key")]
    pub flag_key: String,
    /// Icon toggled on tokens that carry conditions
    #[serde(default = "default_indicator_icon")]
    pub indicator_icon: String,
    /// Label given to conditions created from the form
    #[serde(default = "default_label")]
    pub default_label: String,
    /// Description given to conditions created from the form
    #[serde(default = "default_description")]
    pub default_description: String,
    /// SQLite file for flags; `None` keeps flags in memory
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Post condition reminders when a turn starts
    #[serde(default = "default_true")]
    pub announce_turns: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            flag_key: default_flag_key(),
            indicator_icon: default_indicator_icon(),
            default_label: default_label(),
            default_description: default_description(),
            database_path: None,
            announce_turns: true,
        }
    }
}

impl EngineSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut settings = Self::default();
        if let Some(v) = var("NAMESPACE") {
            settings.namespace = v;
        }
        if let Some(v) = var("FLAG_KEY") {
            settings.flag_key = v;
        }
        if let Some(v) = var("ICON") {
            settings.indicator_icon = v;
        }
        if let Some(v) = var("DEFAULT_LABEL") {
            settings.default_label = v;
        }
        if let Some(v) = var("DEFAULT_DESCRIPTION") {
            settings.default_description = v;
        }
        if let Some(v) = var("DB") {
            settings.database_path = Some(PathBuf::from(v));
        }
        if let Some(v) = var("ANNOUNCE") {
            settings.announce_turns =
                parse_bool(&v).ok_or_else(|| SettingsError::Invalid {
                    key: format!("{}ANNOUNCE", ENV_PREFIX),
                    value: v.clone(),
                })?;
        }

        Ok(settings)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
