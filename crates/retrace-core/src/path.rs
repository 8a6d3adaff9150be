//! Pure read/write/merge over nested JSON values by key path.
//!
//! Every write returns a fresh root: the values along the path are rebuilt,
//! siblings are carried over as-is. Precondition for `write` and
//! `merge_at`: any value that already exists along the path must be an
//! object (or an array when the key is an index). Descending through a
//! scalar indicates a programming error in the caller and fails with
//! [`RetraceError::PathConflict`].

use crate::error::{Result, RetraceError};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// One step in a key path: an object field or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Parse a dot-delimited path of object fields. Empty input is the root.
pub fn parse(path: &str) -> Vec<Key> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').map(Key::from).collect()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Descend key by key; `None` the moment a key is absent or the current
/// value cannot contain it.
pub fn read<'a>(root: &'a Value, path: &[Key]) -> Option<&'a Value> {
    let mut current = root;
    for key in path {
        current = match key {
            Key::Name(name) => current.as_object()?.get(name)?,
            Key::Index(index) => current.as_array()?.get(*index)?,
        };
    }
    Some(current)
}

/// Replace the value at `path`, creating intermediate objects where absent.
/// An empty path replaces the whole tree.
pub fn write(root: &Value, path: &[Key], value: Value) -> Result<Value> {
    write_at(root, path, 0, value)
}

/// Shallow-merge `partial` over the object at `path`: keys absent from
/// `partial` are preserved, keys present override. A missing or
/// non-object location is treated as empty; a non-object `partial`
/// replaces the value wholesale.
pub fn merge_at(root: &Value, path: &[Key], partial: &Value) -> Result<Value> {
    let Value::Object(partial) = partial else {
        return write(root, path, partial.clone());
    };
    let mut merged = match read(root, path) {
        Some(Value::Object(existing)) => existing.clone(),
        _ => Map::new(),
    };
    for (key, value) in partial {
        merged.insert(key.clone(), value.clone());
    }
    write(root, path, Value::Object(merged))
}

fn write_at(root: &Value, path: &[Key], depth: usize, value: Value) -> Result<Value> {
    let Some(key) = path.get(depth) else {
        return Ok(value);
    };
    match key {
        Key::Name(name) => {
            let mut fields = match root {
                Value::Object(fields) => fields.clone(),
                Value::Null => Map::new(),
                _ => return Err(conflict(path, depth)),
            };
            let child = fields.get(name).cloned().unwrap_or(Value::Null);
            let child = write_at(&child, path, depth + 1, value)?;
            fields.insert(name.clone(), child);
            Ok(Value::Object(fields))
        }
        Key::Index(index) => {
            let Value::Array(items) = root else {
                return Err(conflict(path, depth));
            };
            if *index >= items.len() {
                return Err(conflict(path, depth));
            }
            let mut items = items.clone();
            items[*index] = write_at(&items[*index], path, depth + 1, value)?;
            Ok(Value::Array(items))
        }
    }
}

fn conflict(path: &[Key], depth: usize) -> RetraceError {
    let rendered = path[..=depth]
        .iter()
        .map(Key::to_string)
        .collect::<Vec<_>>()
        .join(".");
    RetraceError::PathConflict { path: rendered }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_descends_nested_fields() {
        let tree = json!({"a": {"b": {"c": 3}}});
        assert_eq!(read(&tree, &parse("a.b.c")), Some(&json!(3)));
        assert_eq!(read(&tree, &parse("a.b")), Some(&json!({"c": 3})));
    }

    #[test]
    fn read_absent_key_is_none() {
        let tree = json!({"a": {"b": 1}});
        assert_eq!(read(&tree, &parse("a.x")), None);
        assert_eq!(read(&tree, &parse("a.b.c")), None);
    }

    #[test]
    fn read_empty_path_is_root() {
        let tree = json!({"a": 1});
        assert_eq!(read(&tree, &[]), Some(&tree));
    }

    #[test]
    fn read_indexes_into_arrays() {
        let tree = json!({"items": [{"x": 1}, {"x": 2}]});
        let path = [Key::from("items"), Key::from(1), Key::from("x")];
        assert_eq!(read(&tree, &path), Some(&json!(2)));
        let out_of_range = [Key::from("items"), Key::from(5)];
        assert_eq!(read(&tree, &out_of_range), None);
    }

    #[test]
    fn write_replaces_existing_value() {
        let tree = json!({"a": {"b": 1}, "c": 2});
        let updated = write(&tree, &parse("a.b"), json!(9)).unwrap();
        assert_eq!(updated, json!({"a": {"b": 9}, "c": 2}));
        // input tree untouched
        assert_eq!(tree, json!({"a": {"b": 1}, "c": 2}));
    }

    #[test]
    fn write_creates_intermediate_objects() {
        let tree = json!({});
        let updated = write(&tree, &parse("a.b.c"), json!(1)).unwrap();
        assert_eq!(updated, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn write_empty_path_replaces_whole_tree() {
        let tree = json!({"a": 1});
        let updated = write(&tree, &[], json!([1, 2])).unwrap();
        assert_eq!(updated, json!([1, 2]));
    }

    #[test]
    fn write_through_scalar_is_a_conflict() {
        let tree = json!({"a": 5});
        let err = write(&tree, &parse("a.b"), json!(1)).unwrap_err();
        assert!(matches!(err, RetraceError::PathConflict { path } if path == "a.b"));
    }

    #[test]
    fn write_updates_array_slot() {
        let tree = json!({"items": [1, 2, 3]});
        let path = [Key::from("items"), Key::from(1)];
        let updated = write(&tree, &path, json!(9)).unwrap();
        assert_eq!(updated, json!({"items": [1, 9, 3]}));
    }

    #[test]
    fn merge_preserves_sibling_keys() {
        let tree = json!({"a": {"b": {"x": 1, "y": 2}}, "other": true});
        let updated = merge_at(&tree, &parse("a.b"), &json!({"y": 9, "z": 3})).unwrap();
        assert_eq!(
            updated,
            json!({"a": {"b": {"x": 1, "y": 9, "z": 3}}, "other": true})
        );
    }

    #[test]
    fn merge_into_absent_location_creates_it() {
        let tree = json!({"a": 1});
        let updated = merge_at(&tree, &parse("b.c"), &json!({"x": 1})).unwrap();
        assert_eq!(updated, json!({"a": 1, "b": {"c": {"x": 1}}}));
    }

    #[test]
    fn merge_at_root_overlays_top_level_keys() {
        let tree = json!({"a": 1, "b": 2});
        let updated = merge_at(&tree, &[], &json!({"b": 9})).unwrap();
        assert_eq!(updated, json!({"a": 1, "b": 9}));
    }

    #[test]
    fn merge_non_object_partial_replaces() {
        let tree = json!({"a": {"b": 1}});
        let updated = merge_at(&tree, &parse("a.b"), &json!(7)).unwrap();
        assert_eq!(updated, json!({"a": {"b": 7}}));
    }
}
