//! Flattening of nested request arguments into dotted attribute keys.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Flat view of a nested argument structure, keyed by dotted path.
///
/// Values borrow from the source structure and are never rewritten.
pub type FlatAttributes<'a> = BTreeMap<String, &'a Value>;

/// Flatten a nested mapping into dotted-path keys.
///
/// Each key of `value` contributes a path segment appended to `prefix`
/// (`prefix.key`, or just `key` when `prefix` is empty). Object values are
/// descended into; everything else, arrays included, is a leaf stored as-is.
/// An empty nested object contributes no keys. `None` yields an empty map.
///
/// ```rust
/// use prisma_tracing::flatten;
/// use serde_json::json;
///
/// let args = json!({ "where": { "id": 1 }, "take": 10 });
/// let flat = flatten(args.as_object(), "prisma.args");
///
/// assert_eq!(flat["prisma.args.where.id"], &json!(1));
/// assert_eq!(flat["prisma.args.take"], &json!(10));
/// ```
pub fn flatten<'a>(value: Option<&'a Map<String, Value>>, prefix: &str) -> FlatAttributes<'a> {
    let mut out = FlatAttributes::new();
    if let Some(map) = value {
        flatten_into(map, prefix, &mut out);
    }
    out
}

fn flatten_into<'a>(map: &'a Map<String, Value>, prefix: &str, out: &mut FlatAttributes<'a>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Object(nested) => flatten_into(nested, &path, out),
            // later keys win if two source paths spell the same dotted key
            leaf => {
                out.insert(path, leaf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat_owned(value: &Value, prefix: &str) -> BTreeMap<String, Value> {
        flatten(value.as_object(), prefix)
            .into_iter()
            .map(|(k, v)| (k, v.clone()))
            .collect()
    }

    #[test]
    fn test_flatten_nested() {
        let args = json!({
            "where": { "id": 1, "profile": { "active": true } },
            "orderBy": { "createdAt": "desc" },
        });

        let flat = flat_owned(&args, "");
        let expected: BTreeMap<String, Value> = [
            ("where.id".to_string(), json!(1)),
            ("where.profile.active".to_string(), json!(true)),
            ("orderBy.createdAt".to_string(), json!("desc")),
        ]
        .into_iter()
        .collect();

        assert_eq!(flat, expected);
    }

    #[test]
    fn test_flatten_with_prefix() {
        let args = json!({ "where": { "email": "a@b.c" } });
        let flat = flat_owned(&args, "prisma.args");

        assert_eq!(flat.len(), 1);
        assert_eq!(flat["prisma.args.where.email"], json!("a@b.c"));
    }

    #[test]
    fn test_flatten_already_flat_is_identity() {
        let args = json!({ "take": 5, "skip": 10, "distinct": "email" });
        let flat = flat_owned(&args, "");

        let original: BTreeMap<String, Value> = args
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(flat, original);
    }

    #[test]
    fn test_flatten_arrays_are_leaves() {
        let args = json!({
            "where": { "id": { "in": [1, 2, 3] } },
            "select": [{ "id": true }],
        });
        let flat = flat_owned(&args, "");

        assert_eq!(flat["where.id.in"], json!([1, 2, 3]));
        assert_eq!(flat["select"], json!([{ "id": true }]));
        assert!(!flat.contains_key("select.0.id"));
    }

    #[test]
    fn test_flatten_keeps_nulls_and_drops_empty_objects() {
        let args = json!({ "where": {}, "cursor": null });
        let flat = flat_owned(&args, "");

        assert_eq!(flat.len(), 1);
        assert_eq!(flat["cursor"], Value::Null);
    }

    #[test]
    fn test_flatten_none_is_empty() {
        assert!(flatten(None, "prisma.args").is_empty());
    }

    #[test]
    fn test_flatten_values_are_borrowed() {
        let args = json!({ "data": { "name": "Alice" } });
        let flat = flatten(args.as_object(), "");

        assert!(std::ptr::eq(flat["data.name"], &args["data"]["name"]));
    }
}
