use serde_json::Value;

use crate::{
    Iteratee,
    source::{Entries, Entry, elements},
};

use super::{invoker, iteration::backwards};

pub fn head(collection: &Value) -> Option<Value> {
    Entries::of(collection).next().map(Entry::into_value)
}

pub fn last(collection: &Value) -> Option<Value> {
    Entries::of(collection).next_back().map(Entry::into_value)
}

/// Every element but the last.
pub fn initial(collection: &Value) -> Vec<Value> {
    drop_right(collection, 1)
}

/// Every element but the first.
pub fn tail(collection: &Value) -> Vec<Value> {
    drop(collection, 1)
}

pub fn take(collection: &Value, n: usize) -> Vec<Value> {
    Entries::of(collection).take(n).map(Entry::into_value).collect()
}

pub fn take_right(collection: &Value, n: usize) -> Vec<Value> {
    let mut items = elements(collection);
    items.drain(..items.len().saturating_sub(n));
    items
}

pub fn drop(collection: &Value, n: usize) -> Vec<Value> {
    Entries::of(collection).skip(n).map(Entry::into_value).collect()
}

pub fn drop_right(collection: &Value, n: usize) -> Vec<Value> {
    let mut items = elements(collection);
    items.truncate(items.len().saturating_sub(n));
    items
}

pub fn take_while(collection: &Value, predicate: impl Into<Iteratee>) -> Vec<Value> {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection)
        .take_while(|entry| pred.test(entry))
        .map(Entry::into_value)
        .collect()
}

pub fn drop_while(collection: &Value, predicate: impl Into<Iteratee>) -> Vec<Value> {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection)
        .skip_while(|entry| pred.test(entry))
        .map(Entry::into_value)
        .collect()
}

/// The longest run of trailing elements `predicate` holds for.
pub fn take_right_while(collection: &Value, predicate: impl Into<Iteratee>) -> Vec<Value> {
    let n = trailing(collection, predicate);
    take_right(collection, n)
}

/// Everything before the trailing elements `predicate` holds for.
pub fn drop_right_while(collection: &Value, predicate: impl Into<Iteratee>) -> Vec<Value> {
    let n = trailing(collection, predicate);
    drop_right(collection, n)
}

fn trailing(collection: &Value, predicate: impl Into<Iteratee>) -> usize {
    let pred = invoker(collection, predicate);
    backwards(collection)
        .take_while(|(index, entry)| pred.test_at(*index, entry))
        .count()
}

/// The elements from `start` up to, not including, `end`.
///
/// Negative bounds count back from the end. A missing `end` means the
/// length of the collection.
///
/// ```
/// use lazyseq::eager::slice;
/// use serde_json::json;
///
/// let array = json!([1, 2, 3, 4]);
/// assert_eq!(slice(&array, 1, Some(-1)), [json!(2), json!(3)]);
/// assert_eq!(slice(&array, -3, Some(2)), [json!(2)]);
/// assert!(slice(&array, 3, Some(1)).is_empty());
/// ```
pub fn slice(collection: &Value, start: isize, end: Option<isize>) -> Vec<Value> {
    let items = elements(collection);
    let (start, end) = bounds(items.len(), start, end);
    items
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

pub(crate) fn bounds(len: usize, start: isize, end: Option<isize>) -> (usize, usize) {
    let clamp = |bound: isize| {
        if bound < 0 {
            len.saturating_sub(bound.unsigned_abs())
        } else {
            bound.unsigned_abs().min(len)
        }
    };
    (clamp(start), end.map_or(len, clamp))
}

pub fn reverse(collection: &Value) -> Vec<Value> {
    let mut items = elements(collection);
    items.reverse();
    items
}

/// Splits the elements into arrays of `size`. The last chunk holds the
/// remainder. A `size` of zero yields nothing.
pub fn chunk(collection: &Value, size: usize) -> Vec<Value> {
    if size == 0 {
        return Vec::new();
    }

    elements(collection)
        .chunks(size)
        .map(|chunk| Value::Array(chunk.to_vec()))
        .collect()
}
