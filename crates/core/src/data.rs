//! Loosely-typed configuration and data bags.
//!
//! Both are plain JSON objects: the configuration comes from callers that build
//! it by hand (or from a page context), and the resulting bag goes straight to
//! a template layer.

use serde_json::{Map, Value};

/// Caller-supplied topbar configuration.
pub type Configuration = Map<String, Value>;

/// Merged facts + configuration handed to rendering.
pub type DataBag = Map<String, Value>;

/// Loose truthiness used by the form layer that produces configurations.
///
/// Falsy: `null`, `false`, `0`, `0.0`, `""`, `"0"`, empty arrays and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Whether `key` is present with a truthy value.
pub fn flag(config: &Configuration, key: &str) -> bool {
    config.get(key).is_some_and(is_truthy)
}

/// Whether `key` is present and not `null`.
pub fn is_set(config: &Configuration, key: &str) -> bool {
    config.get(key).is_some_and(|v| !v.is_null())
}

/// Read `key` as a string if it is set.
///
/// Scalars are stringified (`7` → `"7"`), compound values are ignored.
pub fn string_value(config: &Configuration, key: &str) -> Option<String> {
    match config.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Unwrap a JSON object into a bag; any other value yields an empty bag.
pub fn object(value: Value) -> DataBag {
    match value {
        Value::Object(map) => map,
        _ => DataBag::new(),
    }
}

/// Overlay `top` on `base`: keys present in `top` replace those in `base`.
pub fn overlay(mut base: DataBag, top: &DataBag) -> DataBag {
    for (key, value) in top {
        base.insert(key.clone(), value.clone());
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_form_semantics() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("false"), json!("00"), json!([0]), json!({"a": 0})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn is_set_ignores_null() {
        let config = object(json!({"a": null, "b": false}));
        assert!(!is_set(&config, "a"));
        assert!(is_set(&config, "b"));
        assert!(!is_set(&config, "c"));
    }

    #[test]
    fn object_drops_non_objects() {
        assert!(object(json!([1, 2])).is_empty());
        assert_eq!(object(json!({"a": 1})).len(), 1);
    }

    #[test]
    fn string_value_stringifies_scalars() {
        let config = object(json!({"n": 7, "s": "x", "o": {}}));
        assert_eq!(string_value(&config, "n").as_deref(), Some("7"));
        assert_eq!(string_value(&config, "s").as_deref(), Some("x"));
        assert_eq!(string_value(&config, "o"), None);
    }

    proptest! {
        /// Property: after an overlay, every key of `top` carries `top`'s value
        /// and every other key of `base` is untouched.
        #[test]
        fn overlay_prefers_top(
            base in prop::collection::btree_map("[a-e]", 0i64..100, 0..6),
            top in prop::collection::btree_map("[c-h]", 100i64..200, 0..6),
        ) {
            let base_bag: DataBag = base.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
            let top_bag: DataBag = top.iter().map(|(k, v)| (k.clone(), json!(v))).collect();

            let merged = overlay(base_bag, &top_bag);

            for (k, v) in &top {
                prop_assert_eq!(merged.get(k), Some(&json!(v)));
            }
            for (k, v) in &base {
                if !top.contains_key(k) {
                    prop_assert_eq!(merged.get(k), Some(&json!(v)));
                }
            }
        }
    }
}
