//! JSON object helpers.

use serde_json::{Map, Value};

/// Merges `source` into `target`.
///
/// Nested objects present on both sides are merged recursively. Arrays are
/// replaced, unless `append_lists` is set and the target already holds an
/// array, in which case new values are appended without duplicates. Anything
/// else is overwritten.
pub fn merge_objects(
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    append_lists: bool,
) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_objects(existing, incoming, append_lists);
            }
            (Some(Value::Array(existing)), Value::Array(incoming)) if append_lists => {
                for item in incoming {
                    if !existing.contains(item) {
                        existing.push(item.clone());
                    }
                }
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test helper expects an object"),
        }
    }

    #[test]
    fn test_scalars_are_overwritten() {
        let mut target = object(json!({"domain": "Shared Domain", "beta": false}));
        merge_objects(&mut target, &object(json!({"beta": true})), false);
        assert_eq!(
            Value::Object(target),
            json!({"domain": "Shared Domain", "beta": true})
        );
    }

    #[test]
    fn test_nested_objects_are_merged() {
        let mut target = object(json!({"a": {"x": 1, "y": 2}}));
        merge_objects(&mut target, &object(json!({"a": {"y": 3, "z": 4}})), false);
        assert_eq!(
            Value::Object(target),
            json!({"a": {"x": 1, "y": 3, "z": 4}})
        );
    }

    #[test]
    fn test_lists_replaced_or_appended() {
        let mut replaced = object(json!({"l": [1, 2]}));
        merge_objects(&mut replaced, &object(json!({"l": [2, 3]})), false);
        assert_eq!(Value::Object(replaced), json!({"l": [2, 3]}));

        let mut appended = object(json!({"l": [1, 2]}));
        merge_objects(&mut appended, &object(json!({"l": [2, 3]})), true);
        assert_eq!(Value::Object(appended), json!({"l": [1, 2, 3]}));
    }
}
