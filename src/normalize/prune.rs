//! Recursive removal of empty content from JSON trees.

use serde_json::{Map, Value};

/// Removes `null`, `false`, empty strings and empty arrays/objects.
///
/// Children are pruned before their parent is judged, so a parent left with
/// nothing but removed children is removed too. Returns `None` when the whole
/// value collapses.
pub fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => {
            let kept: Vec<Value> = items.into_iter().filter_map(prune).collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, child)| prune(child).map(|child| (key, child)))
                .collect();
            (!kept.is_empty()).then_some(Value::Object(kept))
        }
        other => Some(other),
    }
}

/// Like [`prune`], but an entirely empty value becomes an empty object.
pub fn prune_or_empty(value: Value) -> Value {
    prune(value).unwrap_or_else(|| Value::Object(Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prune_removes_empty_leaves() {
        let value = json!({
            "a": "x",
            "b": "",
            "c": null,
            "d": false,
            "e": true,
            "f": 0,
            "g": [],
            "h": {}
        });

        assert_eq!(prune(value), Some(json!({"a": "x", "e": true, "f": 0})));
    }

    #[test]
    fn test_prune_is_post_order() {
        let value = json!({
            "keep": 1,
            "outer": {"inner": {"flag": false, "list": [null, ""]}}
        });

        assert_eq!(prune(value), Some(json!({"keep": 1})));
    }

    #[test]
    fn test_prune_arrays() {
        let value = json!([{"k": ""}, {"k": "v"}, [], 3]);
        assert_eq!(prune(value), Some(json!([{"k": "v"}, 3])));
    }

    #[test]
    fn test_prune_collapses_to_none() {
        assert_eq!(prune(json!({"a": {"b": []}})), None);
        assert_eq!(prune_or_empty(json!({"a": {"b": []}})), json!({}));
    }

    #[test]
    fn test_prune_is_idempotent() {
        let value = json!({"a": [{"b": "", "c": 1}], "d": {"e": false}});
        let once = prune(value).unwrap();
        let twice = prune(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}
