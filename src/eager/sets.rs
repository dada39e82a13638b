use std::collections::HashSet;

use serde_json::Value;

use crate::{
    Entry, Iteratee, Settings,
    adaptors::{Invoker, Scope},
    source::elements,
    value::{canonical, is_truthy, same_value_zero},
};

/// Values seen so far, compared with [`same_value_zero`].
///
/// Small inputs are scanned linearly. Once an input reaches the configured
/// size the values are indexed by their canonical form instead.
enum Seen {
    Linear(Vec<Value>),
    Hashed(HashSet<String>),
}

impl Seen {
    fn contains(&self, value: &Value) -> bool {
        match self {
            Self::Linear(values) => values.iter().any(|seen| same_value_zero(seen, value)),
            Self::Hashed(keys) => keys.contains(&canonical(value)),
        }
    }

    /// Returns `true` if `value` was not seen before.
    fn insert(&mut self, value: Value) -> bool {
        match self {
            Self::Linear(values) => {
                if values.iter().any(|seen| same_value_zero(seen, &value)) {
                    false
                } else {
                    values.push(value);
                    true
                }
            }
            Self::Hashed(keys) => keys.insert(canonical(&value)),
        }
    }
}

/// The set operations, bound to the size at which they switch to hashing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SetOps {
    large_array_size: usize,
}

impl Default for SetOps {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl SetOps {
    pub(crate) fn new(settings: &Settings) -> Self {
        Self {
            large_array_size: settings.large_array_size,
        }
    }

    fn seen(&self, len: usize) -> Seen {
        if len >= self.large_array_size {
            Seen::Hashed(HashSet::with_capacity(len))
        } else {
            Seen::Linear(Vec::new())
        }
    }

    fn seen_from(&self, values: impl IntoIterator<Item = Value>) -> Seen {
        let values: Vec<_> = values.into_iter().collect();
        let mut seen = self.seen(values.len());
        for value in values {
            seen.insert(value);
        }
        seen
    }

    pub(crate) fn uniq_by(&self, values: Vec<Value>, iteratee: Iteratee) -> Vec<Value> {
        let mut key = keyer(iteratee);
        let mut seen = self.seen(values.len());
        values
            .into_iter()
            .filter(|value| seen.insert(key(value)))
            .collect()
    }

    pub(crate) fn union_by(&self, arrays: &[Value], iteratee: Iteratee) -> Vec<Value> {
        let values = arrays.iter().filter(|a| a.is_array()).flat_map(elements).collect();
        self.uniq_by(values, iteratee)
    }

    pub(crate) fn difference_by(
        &self,
        array: &Value,
        others: &[Value],
        iteratee: Iteratee,
    ) -> Vec<Value> {
        if !array.is_array() {
            return Vec::new();
        }
        let excluded = others.iter().filter(|o| o.is_array()).flat_map(elements);
        self.excluding(elements(array), excluded, iteratee)
    }

    fn excluding(
        &self,
        values: Vec<Value>,
        excluded: impl IntoIterator<Item = Value>,
        iteratee: Iteratee,
    ) -> Vec<Value> {
        let mut key = keyer(iteratee);
        let excluded = self.seen_from(excluded.into_iter().map(|value| key(&value)));
        values
            .into_iter()
            .filter(|value| !excluded.contains(&key(value)))
            .collect()
    }

    pub(crate) fn intersection_by(&self, arrays: &[Value], iteratee: Iteratee) -> Vec<Value> {
        let Some((first, rest)) = arrays.split_first() else {
            return Vec::new();
        };
        if !arrays.iter().all(Value::is_array) {
            return Vec::new();
        }

        let mut key = keyer(iteratee);
        let others: Vec<Seen> = rest
            .iter()
            .map(|other| self.seen_from(elements(other).iter().map(&mut key)))
            .collect();
        let first = elements(first);
        let mut emitted = self.seen(first.len());
        first
            .into_iter()
            .filter(|value| {
                let k = key(value);
                others.iter().all(|other| other.contains(&k)) && emitted.insert(k)
            })
            .collect()
    }

    pub(crate) fn xor_by(&self, arrays: &[Value], iteratee: Iteratee) -> Vec<Value> {
        let arrays: Vec<&Value> = arrays.iter().filter(|a| a.is_array()).collect();
        if let [single] = arrays.as_slice() {
            return self.uniq_by(elements(single), iteratee);
        }

        let mut parts = Vec::new();
        for (i, array) in arrays.iter().enumerate() {
            let others = arrays
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .flat_map(|(_, other)| elements(other));
            parts.extend(self.excluding(elements(array), others, iteratee.clone()));
        }
        self.uniq_by(parts, iteratee)
    }
}

/// Resolves the key function of a set operation. It is handed the value
/// alone, with no position or collection.
fn keyer(iteratee: Iteratee) -> impl FnMut(&Value) -> Value {
    let invoker = Invoker::new(iteratee.resolve(), Scope::detached());
    move |value| invoker.call_at(0, &Entry::new(value.clone()))
}

/// Removes falsey elements.
pub fn compact(collection: &Value) -> Vec<Value> {
    elements(collection).into_iter().filter(is_truthy).collect()
}

/// The elements with duplicates removed, first occurrence first.
pub fn uniq(collection: &Value) -> Vec<Value> {
    SetOps::default().uniq_by(elements(collection), Iteratee::Identity)
}

/// Like [`uniq`], comparing the results of `iteratee`.
pub fn uniq_by(collection: &Value, iteratee: impl Into<Iteratee>) -> Vec<Value> {
    SetOps::default().uniq_by(elements(collection), iteratee.into())
}

/// The unique values of every array argument, in order of first appearance.
/// Arguments that are not arrays are ignored.
///
/// ```
/// use lazyseq::eager::union;
/// use serde_json::json;
///
/// assert_eq!(union(&[json!([2]), json!([1, 2])]), [json!(2), json!(1)]);
/// assert_eq!(union(&[json!(null), json!([1, 2])]), [json!(1), json!(2)]);
/// ```
pub fn union(arrays: &[Value]) -> Vec<Value> {
    SetOps::default().union_by(arrays, Iteratee::Identity)
}

pub fn union_by(arrays: &[Value], iteratee: impl Into<Iteratee>) -> Vec<Value> {
    SetOps::default().union_by(arrays, iteratee.into())
}

/// The elements of `array` not found in any of `others`.
///
/// A non-array `array` yields nothing; non-array `others` are ignored.
pub fn difference(array: &Value, others: &[Value]) -> Vec<Value> {
    SetOps::default().difference_by(array, others, Iteratee::Identity)
}

pub fn difference_by(array: &Value, others: &[Value], iteratee: impl Into<Iteratee>) -> Vec<Value> {
    SetOps::default().difference_by(array, others, iteratee.into())
}

/// The unique values present in every array. Any non-array argument makes
/// the intersection empty.
pub fn intersection(arrays: &[Value]) -> Vec<Value> {
    SetOps::default().intersection_by(arrays, Iteratee::Identity)
}

pub fn intersection_by(arrays: &[Value], iteratee: impl Into<Iteratee>) -> Vec<Value> {
    SetOps::default().intersection_by(arrays, iteratee.into())
}

/// The symmetric difference: values of each array that appear in no other
/// array, made unique. Non-array arguments are ignored.
///
/// ```
/// use lazyseq::eager::xor;
/// use serde_json::json;
///
/// assert_eq!(xor(&[json!([2, 1]), json!([2, 3]), json!([3, 4])]), [json!(1), json!(4)]);
/// assert_eq!(xor(&[json!([1, 1])]), [json!(1)]);
/// ```
pub fn xor(arrays: &[Value]) -> Vec<Value> {
    SetOps::default().xor_by(arrays, Iteratee::Identity)
}

pub fn xor_by(arrays: &[Value], iteratee: impl Into<Iteratee>) -> Vec<Value> {
    SetOps::default().xor_by(arrays, iteratee.into())
}

/// The elements of `array` other than `values`.
pub fn without(array: &Value, values: &[Value]) -> Vec<Value> {
    difference(array, &[Value::Array(values.to_vec())])
}

/// Like [`uniq`], treating two values as the same when `comparator` says so.
///
/// Comparators cannot be hashed, so the `_with` operations always scan.
/// `comparator` is called with the candidate first.
pub fn uniq_with(collection: &Value, comparator: impl Fn(&Value, &Value) -> bool) -> Vec<Value> {
    distinct_with(elements(collection), &comparator)
}

/// Like [`union`], comparing values with `comparator`.
pub fn union_with(arrays: &[Value], comparator: impl Fn(&Value, &Value) -> bool) -> Vec<Value> {
    let values = arrays.iter().filter(|a| a.is_array()).flat_map(elements).collect();
    distinct_with(values, &comparator)
}

/// Like [`difference`], comparing values with `comparator`.
pub fn difference_with(
    array: &Value,
    others: &[Value],
    comparator: impl Fn(&Value, &Value) -> bool,
) -> Vec<Value> {
    if !array.is_array() {
        return Vec::new();
    }
    let excluded: Vec<Value> = others.iter().filter(|o| o.is_array()).flat_map(elements).collect();
    excluding_with(elements(array), &excluded, &comparator)
}

/// Like [`intersection`], comparing values with `comparator`.
pub fn intersection_with(
    arrays: &[Value],
    comparator: impl Fn(&Value, &Value) -> bool,
) -> Vec<Value> {
    let Some((first, rest)) = arrays.split_first() else {
        return Vec::new();
    };
    if !arrays.iter().all(Value::is_array) {
        return Vec::new();
    }

    let rest: Vec<Vec<Value>> = rest.iter().map(elements).collect();
    let shared = elements(first)
        .into_iter()
        .filter(|value| {
            rest.iter()
                .all(|other| other.iter().any(|o| comparator(value, o)))
        })
        .collect();
    distinct_with(shared, &comparator)
}

/// Like [`xor`], comparing values with `comparator`.
pub fn xor_with(arrays: &[Value], comparator: impl Fn(&Value, &Value) -> bool) -> Vec<Value> {
    let arrays: Vec<Vec<Value>> = arrays.iter().filter(|a| a.is_array()).map(elements).collect();
    if let [single] = arrays.as_slice() {
        return distinct_with(single.clone(), &comparator);
    }

    let mut parts = Vec::new();
    for (i, array) in arrays.iter().enumerate() {
        let others: Vec<Value> = arrays
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .flat_map(|(_, other)| other.iter().cloned())
            .collect();
        parts.extend(excluding_with(array.clone(), &others, &comparator));
    }
    distinct_with(parts, &comparator)
}

/// The elements of `array` that `comparator` matches against none of
/// `values`. Leaves `array` itself untouched.
pub fn pull_all_with(
    array: &Value,
    values: &[Value],
    comparator: impl Fn(&Value, &Value) -> bool,
) -> Vec<Value> {
    excluding_with(elements(array), values, &comparator)
}

fn distinct_with(values: Vec<Value>, comparator: &dyn Fn(&Value, &Value) -> bool) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(values.len());
    for value in values {
        if !out.iter().any(|seen| comparator(&value, seen)) {
            out.push(value);
        }
    }
    out
}

fn excluding_with(
    values: Vec<Value>,
    excluded: &[Value],
    comparator: &dyn Fn(&Value, &Value) -> bool,
) -> Vec<Value> {
    values
        .into_iter()
        .filter(|value| !excluded.iter().any(|ex| comparator(value, ex)))
        .collect()
}
