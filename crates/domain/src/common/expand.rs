//! Expansion of flat, dot-delimited form data into nested documents.

use serde_json::{Map, Value};

/// Expand `{"a.b": 1}` into `{"a": {"b": 1}}`.
///
/// Later keys win when a path collides with a non-object value.
///
/// ```
/// use condition_reminders_domain::common::expand_object;
/// use serde_json::{json, Map};
///
/// let mut flat = Map::new();
/// flat.insert("c1.label".into(), json!("Stunned"));
/// assert_eq!(expand_object(flat), json!({"c1": {"label": "Stunned"}}));
/// ```
pub fn expand_object(flat: Map<String, Value>) -> Value {
    let mut root = Map::new();

    for (path, value) in flat {
        let segments: Vec<&str> = path.split('.').collect();
        insert_path(&mut root, &segments, value);
    }

    Value::Object(root)
}

fn insert_path(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(next) = slot {
                insert_path(next, rest, value);
            }
        }
    }
}
