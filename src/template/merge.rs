//! Deep merge of rendered declarations into a host resource collection.
//!
//! Rules, applied recursively:
//! - object into object: merge key by key, existing keys keep their position
//! - array into array: merge element by element; surplus target elements stay
//! - anything else: the source value replaces the target value
//!
//! Merging never removes keys, so merging the same source twice is a no-op
//! the second time.

use serde_json::{Map, Value};

/// Merge `source` on top of `target`.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_objects(target, source),
        (Value::Array(target), Value::Array(source)) => {
            let mut source = source.into_iter();
            for slot in target.iter_mut() {
                match source.next() {
                    Some(value) => deep_merge(slot, value),
                    None => return,
                }
            }
            target.extend(source);
        }
        (target, source) => *target = source,
    }
}

/// Merge every key of `source` into `target`.
pub fn merge_objects(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_are_replaced() {
        let mut target = json!({ "a": 1, "b": "x" });
        deep_merge(&mut target, json!({ "a": 2 }));
        assert_eq!(target, json!({ "a": 2, "b": "x" }));
    }

    #[test]
    fn test_nested_objects_merge_key_by_key() {
        let mut target = json!({ "tags": { "team": "data", "env": "dev" } });
        deep_merge(&mut target, json!({ "tags": { "env": "prod", "owner": "ops" } }));
        assert_eq!(
            target,
            json!({ "tags": { "team": "data", "env": "prod", "owner": "ops" } })
        );
    }

    #[test]
    fn test_arrays_merge_by_index() {
        let mut target = json!([{ "a": 1 }, { "b": 2 }, { "c": 3 }]);
        deep_merge(&mut target, json!([{ "a": 10 }, { "z": 0 }]));
        assert_eq!(target, json!([{ "a": 10 }, { "b": 2, "z": 0 }, { "c": 3 }]));
    }

    #[test]
    fn test_longer_source_array_extends_target() {
        let mut target = json!(["a"]);
        deep_merge(&mut target, json!(["b", "c"]));
        assert_eq!(target, json!(["b", "c"]));
    }

    #[test]
    fn test_type_mismatch_replaces() {
        let mut target = json!({ "a": [1, 2] });
        deep_merge(&mut target, json!({ "a": { "k": "v" } }));
        assert_eq!(target, json!({ "a": { "k": "v" } }));
    }

    #[test]
    fn test_existing_keys_keep_position() {
        let mut target = Map::new();
        target.insert("First".into(), json!(1));
        target.insert("Second".into(), json!(2));

        let mut source = Map::new();
        source.insert("Third".into(), json!(3));
        source.insert("First".into(), json!(10));
        merge_objects(&mut target, source);

        let keys: Vec<&String> = target.keys().collect();
        assert_eq!(keys, vec!["First", "Second", "Third"]);
        assert_eq!(target["First"], json!(10));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let source = json!({ "A": { "Type": "T", "Properties": { "L": [1, { "x": true }] } } });
        let mut once = json!({ "Existing": {} });
        deep_merge(&mut once, source.clone());
        let mut twice = once.clone();
        deep_merge(&mut twice, source);
        assert_eq!(once, twice);
    }
}
