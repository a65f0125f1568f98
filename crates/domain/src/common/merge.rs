//! Deep-merge of JSON flag documents.
//!
//! A flag write is a partial document merged into the stored one:
//! - objects merge key by key, recursively
//! - any other value replaces what was there (arrays included)
//! - a key written as `-=<name>` removes `<name>` from the target

use serde_json::{Map, Value};

/// Prefix marking a key for deletion in a merge patch.
pub const DELETE_KEY_PREFIX: &str = "-=";

/// Build the patch key that deletes `key` when merged.
///
/// ```
/// use condition_reminders_domain::common::deletion_key;
///
/// assert_eq!(deletion_key("abc"), "-=abc");
/// ```
pub fn deletion_key(key: &str) -> String {
    format!("{}{}", DELETE_KEY_PREFIX, key)
}

/// Merge `patch` into `target` in place.
pub fn merge_object(target: &mut Value, patch: Value) {
    let Value::Object(patch) = patch else {
        *target = patch;
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(target) = target else {
        return;
    };

    for (key, value) in patch {
        if let Some(doomed) = key.strip_prefix(DELETE_KEY_PREFIX) {
            target.shift_remove(doomed);
            continue;
        }

        match (target.get_mut(&key), value) {
            (Some(existing @ Value::Object(_)), value @ Value::Object(_)) => {
                merge_object(existing, value);
            }
            (_, value @ Value::Object(_)) => {
                // Fresh objects still go through merge so nested deletion keys are dropped
                let mut fresh = Value::Object(Map::new());
                merge_object(&mut fresh, value);
                target.insert(key, fresh);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
