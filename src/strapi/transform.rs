//! Entry normalization
//!
//! Flattens the nested `{id, attributes}` envelope the API wraps around
//! entries into plain attribute maps, descending into relation fields only
//! when the caller asked for them via the population spec.

use serde_json::{Map, Value};

/// Splits a comma-separated population spec into relation field names.
///
/// A single name with no commas yields a list of one; `None` or an empty
/// string yields an empty list.
pub fn split_populate(populate: Option<&str>) -> Vec<String> {
    populate
        .map(|spec| {
            spec.split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Normalizes an entry (or an array of entries) into flat attribute maps.
///
/// An object lacking both `id` and `attributes` passes through unchanged, so
/// already-flat shapes are idempotent under normalization. Otherwise the
/// result is the `attributes` mapping with `id` merged in at top level. Each
/// relation named in `populate` that is present in the result is replaced by
/// the recursively normalized form of its `data` sub-field (collection-style
/// relation) or of itself (already-flat relation).
pub fn transform_data(value: Value, populate: &[String]) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| transform_data(item, populate))
                .collect(),
        ),
        Value::Object(map) => transform_entry(map, populate),
        other => other,
    }
}

fn transform_entry(mut map: Map<String, Value>, populate: &[String]) -> Value {
    if !map.contains_key("id") && !map.contains_key("attributes") {
        return Value::Object(map);
    }

    let id = map.remove("id");
    let mut flat = match map.remove("attributes") {
        Some(Value::Object(attributes)) => attributes,
        _ => Map::new(),
    };
    if let Some(id) = id {
        flat.insert("id".to_string(), id);
    }

    for name in populate {
        if let Some(relation) = flat.remove(name) {
            let normalized = match relation {
                Value::Object(mut rel) if rel.contains_key("data") => {
                    // data sub-field present means a collection-style relation
                    match rel.remove("data") {
                        Some(data) => transform_data(data, populate),
                        None => Value::Object(rel),
                    }
                }
                other => transform_data(other, populate),
            };
            flat.insert(name.clone(), normalized);
        }
    }

    Value::Object(flat)
}
