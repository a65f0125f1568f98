//! Localization lookup table.
//!
//! Ships English strings for every key the engine uses; the host can replace
//! or extend them with its own translations.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::infrastructure::ports::LocalizationPort;

/// Translation keys used by the engine.
pub mod keys {
    /// Dismiss button text and tooltip on announcements
    pub const END_CONDITION: &str = "CONDITION-REMINDERS.end-condition";
    /// Toggle attempted with no tokens selected
    pub const NO_SELECTION: &str = "CONDITION-REMINDERS.no-selection";
}

const ENGLISH: &[(&str, &str)] = &[
    (keys::END_CONDITION, "End Condition"),
    (keys::NO_SELECTION, "At Least One Token Must Be Selected"),
];

/// In-memory translation table.
pub struct StaticLocalization {
    entries: RwLock<HashMap<String, String>>,
}

impl StaticLocalization {
    pub fn new() -> Self {
        Self::with_entries(HashMap::new())
    }

    /// English defaults overlaid with `entries`.
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        let localization = Self {
            entries: RwLock::new(
                ENGLISH
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        };
        localization.extend(entries);
        localization
    }

    /// Add or replace translations.
    pub fn extend(&self, entries: impl IntoIterator<Item = (String, String)>) {
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        guard.extend(entries);
    }
}

impl Default for StaticLocalization {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalizationPort for StaticLocalization {
    fn localize(&self, key: &str) -> String {
        let guard = self.entries.read().unwrap_or_else(|e| e.into_inner());
        guard.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_defaults_are_present() {
        let l10n = StaticLocalization::new();
        assert_eq!(l10n.localize(keys::END_CONDITION), "End Condition");
        assert_eq!(
            l10n.localize(keys::NO_SELECTION),
            "At Least One Token Must Be Selected"
        );
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let l10n = StaticLocalization::new();
        assert_eq!(l10n.localize("NOPE.missing"), "NOPE.missing");
    }

    #[test]
    fn test_host_translations_replace_defaults() {
        let l10n = StaticLocalization::new();
        l10n.extend([(keys::END_CONDITION.to_string(), "Zustand beenden".to_string())]);
        assert_eq!(l10n.localize(keys::END_CONDITION), "Zustand beenden");
    }
}
