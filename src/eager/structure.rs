use itertools::Itertools;
use serde_json::{Map, Value};

use crate::{
    Iteratee,
    source::{Entries, elements},
    value::{compare, to_key},
};

use super::invoker;

/// Flattens one level of nesting.
pub fn flatten(collection: &Value) -> Vec<Value> {
    let mut out = Vec::new();
    for value in elements(collection) {
        match value {
            Value::Array(items) => out.extend(items),
            other => out.push(other),
        }
    }
    out
}

/// `collection` followed by every one of `values`, with array values
/// spliced in one level deep.
///
/// A `collection` that is not an array counts as a single value.
pub fn concat(collection: &Value, values: &[Value]) -> Vec<Value> {
    let mut out = match collection {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    for value in values {
        match value {
            Value::Array(items) => out.extend(items.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Groups the elements at the same position across `arrays`. Shorter
/// arrays are padded with `null`; non-array arguments are ignored.
///
/// ```
/// use lazyseq::eager::zip;
/// use serde_json::json;
///
/// assert_eq!(
///     zip(&[json!(["a", "b"]), json!([1])]),
///     [json!(["a", 1]), json!(["b", null])],
/// );
/// ```
pub fn zip(arrays: &[Value]) -> Vec<Value> {
    let arrays: Vec<&Vec<Value>> = arrays.iter().filter_map(Value::as_array).collect();
    let len = arrays.iter().map(|a| a.len()).max().unwrap_or(0);
    (0..len)
        .map(|i| {
            Value::Array(
                arrays
                    .iter()
                    .map(|a| a.get(i).cloned().unwrap_or(Value::Null))
                    .collect(),
            )
        })
        .collect()
}

/// Groups the elements by the key `iteratee` gives them.
///
/// Groups appear in the order their key is first produced.
pub fn group_by(collection: &Value, iteratee: impl Into<Iteratee>) -> Map<String, Value> {
    let mut f = invoker(collection, iteratee);
    let mut groups = Map::new();
    for entry in Entries::of(collection) {
        let key = to_key(&f.call(&entry));
        let group = groups.entry(key).or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = group {
            items.push(entry.value);
        }
    }
    groups
}

/// Counts the elements per key `iteratee` gives them.
pub fn count_by(collection: &Value, iteratee: impl Into<Iteratee>) -> Map<String, Value> {
    let mut f = invoker(collection, iteratee);
    let mut counts = Map::new();
    for entry in Entries::of(collection) {
        let key = to_key(&f.call(&entry));
        let count = counts.get(&key).and_then(Value::as_u64).unwrap_or(0);
        counts.insert(key, (count + 1).into());
    }
    counts
}

/// Indexes the elements by the key `iteratee` gives them. A later element
/// replaces an earlier one with the same key.
pub fn key_by(collection: &Value, iteratee: impl Into<Iteratee>) -> Map<String, Value> {
    let mut f = invoker(collection, iteratee);
    Entries::of(collection)
        .map(|entry| (to_key(&f.call(&entry)), entry.value))
        .collect()
}

/// Sorts the elements by the result of `iteratee`, keeping the original
/// order of equal elements. See [`compare`] for the ordering.
pub fn sort_by(collection: &Value, iteratee: impl Into<Iteratee>) -> Vec<Value> {
    let mut f = invoker(collection, iteratee);
    Entries::of(collection)
        .map(|entry| (f.call(&entry), entry.value))
        .sorted_by(|(a, _), (b, _)| compare(a, b))
        .map(|(_, value)| value)
        .collect()
}

/// `[key, value]` pairs. Array and string elements are keyed by position.
pub fn to_pairs(collection: &Value) -> Vec<Value> {
    keyed(collection)
        .map(|(key, value)| Value::Array(vec![Value::String(key), value]))
        .collect()
}

/// The keys of a mapping, or the positions of an array or string.
pub fn keys(collection: &Value) -> Vec<Value> {
    keyed(collection).map(|(key, _)| Value::String(key)).collect()
}

pub fn values(collection: &Value) -> Vec<Value> {
    elements(collection)
}

fn keyed(collection: &Value) -> impl Iterator<Item = (String, Value)> + '_ {
    Entries::of(collection)
        .enumerate()
        .map(|(i, entry)| (entry.key.unwrap_or_else(|| i.to_string()), entry.value))
}
