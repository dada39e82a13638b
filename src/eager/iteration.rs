use serde_json::{Map, Value};

use crate::{
    Iteratee,
    source::{Entries, Entry},
    value::same_value_zero,
};

use super::invoker;

/// Applies `iteratee` to every element.
pub fn map(collection: &Value, iteratee: impl Into<Iteratee>) -> Vec<Value> {
    let mut f = invoker(collection, iteratee);
    Entries::of(collection).map(|entry| f.call(&entry)).collect()
}

/// The elements `predicate` is truthy for.
pub fn filter(collection: &Value, predicate: impl Into<Iteratee>) -> Vec<Value> {
    select(collection, predicate, true)
}

/// The elements `predicate` is falsey for.
pub fn reject(collection: &Value, predicate: impl Into<Iteratee>) -> Vec<Value> {
    select(collection, predicate, false)
}

fn select(collection: &Value, predicate: impl Into<Iteratee>, keep: bool) -> Vec<Value> {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection)
        .filter(|entry| pred.test(entry) == keep)
        .map(Entry::into_value)
        .collect()
}

pub fn find(collection: &Value, predicate: impl Into<Iteratee>) -> Option<Value> {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection)
        .find(|entry| pred.test(entry))
        .map(Entry::into_value)
}

/// Like [`find`], scanning from the end. The predicate still receives each
/// element's own position.
pub fn find_last(collection: &Value, predicate: impl Into<Iteratee>) -> Option<Value> {
    let pred = invoker(collection, predicate);
    backwards(collection)
        .find(|(index, entry)| pred.test_at(*index, entry))
        .map(|(_, entry)| entry.value)
}

pub fn find_index(collection: &Value, predicate: impl Into<Iteratee>) -> Option<usize> {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection).position(|entry| pred.test(&entry))
}

pub fn find_last_index(collection: &Value, predicate: impl Into<Iteratee>) -> Option<usize> {
    let pred = invoker(collection, predicate);
    backwards(collection)
        .find(|(index, entry)| pred.test_at(*index, entry))
        .map(|(index, _)| index)
}

/// Entries from last to first, paired with their position from the front.
pub(super) fn backwards(collection: &Value) -> impl Iterator<Item = (usize, Entry)> + '_ {
    (0..size(collection)).rev().zip(Entries::of(collection).rev())
}

pub fn some(collection: &Value, predicate: impl Into<Iteratee>) -> bool {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection).any(|entry| pred.test(&entry))
}

pub fn every(collection: &Value, predicate: impl Into<Iteratee>) -> bool {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection).all(|entry| pred.test(&entry))
}

/// Folds the elements into an accumulator.
///
/// Without an initial `accumulator` the first element seeds it; an empty
/// collection then reduces to `None`.
///
/// ```
/// use lazyseq::eager::reduce;
/// use serde_json::{Value, json};
///
/// let sum = |acc: Value, v: &Value| json!(acc.as_i64().unwrap_or(0) + v.as_i64().unwrap_or(0));
///
/// assert_eq!(reduce(&json!([1, 2, 3]), sum, None), Some(json!(6)));
/// assert_eq!(reduce(&json!([]), sum, Some(json!(10))), Some(json!(10)));
/// assert_eq!(reduce(&json!([]), sum, None), None);
/// ```
pub fn reduce(
    collection: &Value,
    f: impl Fn(Value, &Value) -> Value,
    accumulator: Option<Value>,
) -> Option<Value> {
    Entries::of(collection).fold(accumulator, |accum, entry| {
        Some(match accum {
            Some(accum) => f(accum, &entry.value),
            None => entry.value,
        })
    })
}

/// The number of elements: items, properties, or characters.
pub fn size(collection: &Value) -> usize {
    match collection {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.chars().count(),
        _ => 0,
    }
}

/// Whether `target` is one of the elements, or a substring of a string.
pub fn includes(collection: &Value, target: &Value) -> bool {
    match (collection, target) {
        (Value::String(s), Value::String(target)) => s.contains(target.as_str()),
        _ => Entries::of(collection).any(|entry| same_value_zero(&entry.value, target)),
    }
}

pub fn index_of(collection: &Value, target: &Value) -> Option<usize> {
    Entries::of(collection).position(|entry| same_value_zero(&entry.value, target))
}

/// Maps every value, keeping its key. Array and string elements are keyed
/// by position.
pub fn map_values(collection: &Value, iteratee: impl Into<Iteratee>) -> Map<String, Value> {
    let mut f = invoker(collection, iteratee);
    Entries::of(collection)
        .enumerate()
        .map(|(index, entry)| {
            let value = f.call(&entry);
            (entry.key.unwrap_or_else(|| index.to_string()), value)
        })
        .collect()
}

/// The key/value pairs `predicate` is truthy for.
pub fn pick_by(collection: &Value, predicate: impl Into<Iteratee>) -> Map<String, Value> {
    pick(collection, predicate, true)
}

/// The key/value pairs `predicate` is falsey for.
pub fn omit_by(collection: &Value, predicate: impl Into<Iteratee>) -> Map<String, Value> {
    pick(collection, predicate, false)
}

fn pick(collection: &Value, predicate: impl Into<Iteratee>, keep: bool) -> Map<String, Value> {
    let mut pred = invoker(collection, predicate);
    Entries::of(collection)
        .enumerate()
        .filter(|(_, entry)| pred.test(entry) == keep)
        .map(|(index, entry)| (entry.key.unwrap_or_else(|| index.to_string()), entry.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use serde_json::json;

    use super::*;
    use crate::{
        Callback,
        test_utils::{is_even, square},
    };

    #[test]
    fn shorthands_match_closures() {
        let objects = json!([{ "a": 0 }, { "a": 1 }]);

        assert_eq!(filter(&objects, "a"), filter(&objects, Callback::new(|o| o["a"].clone())));
        assert_eq!(filter(&objects, "a"), [json!({ "a": 1 })]);
        assert_eq!(reject(&objects, "a"), [json!({ "a": 0 })]);
        assert_eq!(filter(&objects, json!({ "a": 1 })), [json!({ "a": 1 })]);
        assert_eq!(reject(&objects, json!({ "a": 1 })), [json!({ "a": 0 })]);
    }

    #[test]
    fn objects_iterate_values() {
        let object = json!({ "a": 1, "b": 2, "c": 3 });

        assert_eq!(map(&object, Callback::new(square)), [json!(1), json!(4), json!(9)]);
        assert_eq!(find(&object, Callback::predicate(is_even)), Some(json!(2)));
        assert_eq!(size(&object), 3);
        assert_eq!(
            Value::Object(pick_by(&object, Callback::predicate(|v| !is_even(v)))),
            json!({ "a": 1, "c": 3 })
        );
    }

    #[test]
    fn find_last_passes_real_positions() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let pred = Callback::with_index(move |v, i| {
            log.borrow_mut().push(i);
            json!(v.as_i64() == Some(1))
        });

        assert_eq!(find_last(&json!([1, 2, 3]), pred), Some(json!(1)));
        assert_eq!(*seen.borrow(), [2, 1, 0]);
        assert_eq!(find_last_index(&json!([1, null, [3], null, 5]), None::<&str>), Some(4));
        assert_eq!(find_index(&json!([null, 0, 2]), None::<&str>), Some(2));
    }

    #[test]
    fn sizes() {
        assert_eq!(size(&json!([1, 2, 3])), 3);
        assert_eq!(size(&json!({ "length": -1 })), 1);
        assert_eq!(size(&json!("héllo")), 5);
        for falsey in [json!(null), json!(false), json!(0), json!("")] {
            assert_eq!(size(&falsey), 0);
        }
    }

    #[test]
    fn membership() {
        assert!(includes(&json!([1, 2]), &json!(2.0)));
        assert!(includes(&json!("abc"), &json!("bc")));
        assert!(!includes(&json!({ "a": 1 }), &json!("a")));
        assert_eq!(index_of(&json!([1, null, [3], null, 5]), &json!(5)), Some(4));
        assert_eq!(index_of(&json!([1]), &json!(2)), None);
    }

    #[test]
    fn map_values_keys_arrays_by_position() {
        assert_eq!(
            Value::Object(map_values(&json!([2, 3]), Callback::new(square))),
            json!({ "0": 4, "1": 9 })
        );
        assert_eq!(
            Value::Object(omit_by(&json!({ "a": 1, "b": 2 }), Callback::predicate(is_even))),
            json!({ "a": 1 })
        );
    }

    #[test]
    fn callbacks_see_a_snapshot() {
        let collection = json!([0]);
        let pred = Callback::with_context(|_, ctx| {
            let mut copy = ctx.collection.clone();
            copy[ctx.index] = json!(1);
            json!(true)
        });

        assert_eq!(filter(&collection, pred), [json!(0)]);
        assert_eq!(collection, json!([0]));
    }

    #[test]
    fn quantifiers() {
        assert!(some(&json!([1, 3, 4]), Callback::predicate(is_even)));
        assert!(!every(&json!([1, 3, 4]), Callback::predicate(is_even)));
        assert!(every(&json!([]), Callback::predicate(is_even)));
        assert!(!some(&json!(null), None::<&str>));
    }
}
