//! Conversion between nested trees and flat dot-path leaves.
//!
//! Trees are `serde_json::Value`s regardless of the file format they came from
//! (see [`crate::core::codec`]). A leaf is any scalar or empty container; only
//! string leaves become translatable entries, the rest ride along untouched
//! (see [`crate::core::Catalog`]).

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::error::{Error, Result};
use super::key::PATH_DELIMITER;

/// Flatten `tree` into `(dot-path, leaf)` pairs in document order.
///
/// Sequences contribute their index as a path segment (`items.0.label`).
/// Two leaves that end up at the same dot-path (e.g. a key containing a dot
/// next to an equivalent nested key) are a [`Error::StructuralConflict`].
pub fn flatten(tree: &Value) -> Result<Vec<(String, Value)>> {
    match tree {
        Value::Object(_) | Value::Array(_) => {}
        Value::Null => return Ok(Vec::new()),
        _ => return Err(Error::conflict("", "root of a catalog must be a mapping")),
    }

    let mut leaves = Vec::new();
    let mut seen = HashSet::new();
    flatten_value(tree, String::new(), &mut seen, &mut leaves)?;
    Ok(leaves)
}

fn flatten_value(
    value: &Value,
    prefix: String,
    seen: &mut HashSet<String>,
    leaves: &mut Vec<(String, Value)>,
) -> Result<()> {
    match value {
        Value::Object(map) if !map.is_empty() || prefix.is_empty() => {
            for (key, val) in map {
                flatten_value(val, join(&prefix, key), seen, leaves)?;
            }
        }
        Value::Array(arr) if !arr.is_empty() || prefix.is_empty() => {
            for (index, val) in arr.iter().enumerate() {
                flatten_value(val, join(&prefix, &index.to_string()), seen, leaves)?;
            }
        }
        leaf => {
            if !seen.insert(prefix.clone()) {
                return Err(Error::conflict(
                    prefix,
                    "two leaves flatten to the same path",
                ));
            }
            leaves.push((prefix, leaf.clone()));
        }
    }
    Ok(())
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_DELIMITER, segment)
    }
}

/// Rebuild a nested tree from `(dot-path, leaf)` pairs.
///
/// Insertion order is preserved. A mapping whose keys are exactly `0..n` is
/// turned back into a sequence. A path that is used both as a leaf and as a
/// parent of other paths is a [`Error::StructuralConflict`].
pub fn unflatten<'a, I, V>(leaves: I) -> Result<Value>
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: Into<Value>,
{
    let mut root = Map::new();

    for (path, leaf) in leaves {
        insert_path(&mut root, path, leaf.into())?;
    }

    Ok(restore_sequences(Value::Object(root)))
}

fn insert_path(root: &mut Map<String, Value>, path: &str, leaf: Value) -> Result<()> {
    let parts: Vec<&str> = path.split(PATH_DELIMITER).collect();
    let Some((last, parents)) = parts.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for (depth, part) in parents.iter().enumerate() {
        let node = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match node {
            Value::Object(map) => map,
            _ => {
                let parent = parts[..=depth].join(".");
                return Err(Error::conflict(
                    path,
                    format!("\"{}\" is already a leaf", parent),
                ));
            }
        };
    }

    match current.get(*last) {
        Some(Value::Object(map)) if !map.is_empty() => Err(Error::conflict(
            path,
            "path is already a parent of other entries",
        )),
        _ => {
            current.insert(last.to_string(), leaf);
            Ok(())
        }
    }
}

fn restore_sequences(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, restore_sequences(v)))
                .collect();
            if is_sequence(&map) {
                let mut items: Vec<(usize, Value)> = map
                    .into_iter()
                    .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
                    .collect();
                items.sort_by_key(|(i, _)| *i);
                Value::Array(items.into_iter().map(|(_, v)| v).collect())
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}

/// True when the keys are the canonical decimals `0..n` in some order.
fn is_sequence(map: &Map<String, Value>) -> bool {
    if map.is_empty() {
        return false;
    }
    let mut present = vec![false; map.len()];
    for key in map.keys() {
        let Ok(index) = key.parse::<usize>() else {
            return false;
        };
        if index.to_string() != *key || index >= present.len() || present[index] {
            return false;
        }
        present[index] = true;
    }
    true
}
