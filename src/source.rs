use std::iter::{FusedIterator, Rev};

use itertools::Either;
use serde_json::Value;

/// One element flowing through a sequence.
///
/// Elements pulled from a mapping keep the property name they were stored
/// under. Elements of arrays and strings have no key.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Option<String>,
    pub value: Value,
}

impl Entry {
    #[inline]
    pub fn new(value: Value) -> Self {
        Self { key: None, value }
    }

    #[inline]
    pub fn keyed(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: Some(key.into()),
            value,
        }
    }

    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// The entries of a collection, in iteration order.
///
/// Arrays yield their items, mappings their values (keyed), strings their
/// characters. Any other value is an empty collection.
pub(crate) enum Entries<'a> {
    Array(std::slice::Iter<'a, Value>),
    Object(serde_json::map::Iter<'a>),
    Chars(std::str::Chars<'a>),
    Empty,
}

impl<'a> Entries<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(items.iter()),
            Value::Object(map) => Self::Object(map.iter()),
            Value::String(s) => Self::Chars(s.chars()),
            _ => Self::Empty,
        }
    }

    /// Walks the entries front to back, or back to front when `reversed`.
    pub(crate) fn walk(value: &'a Value, reversed: bool) -> Either<Self, Rev<Self>> {
        if reversed {
            Either::Right(Self::of(value).rev())
        } else {
            Either::Left(Self::of(value))
        }
    }
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        match self {
            Self::Array(items) => items.next().cloned().map(Entry::new),
            Self::Object(map) => map.next().map(|(key, value)| Entry::keyed(key, value.clone())),
            Self::Chars(chars) => chars.next().map(|c| Entry::new(Value::String(c.into()))),
            Self::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Array(items) => items.size_hint(),
            Self::Object(map) => map.size_hint(),
            Self::Chars(chars) => chars.size_hint(),
            Self::Empty => (0, Some(0)),
        }
    }
}

impl DoubleEndedIterator for Entries<'_> {
    fn next_back(&mut self) -> Option<Entry> {
        match self {
            Self::Array(items) => items.next_back().cloned().map(Entry::new),
            Self::Object(map) => map
                .next_back()
                .map(|(key, value)| Entry::keyed(key, value.clone())),
            Self::Chars(chars) => chars.next_back().map(|c| Entry::new(Value::String(c.into()))),
            Self::Empty => None,
        }
    }
}

impl FusedIterator for Entries<'_> {}

/// Whether entries of `value` carry keys.
#[inline]
pub(crate) fn is_keyed(value: &Value) -> bool {
    value.is_object()
}

/// The values of a collection, cloned.
pub fn elements(value: &Value) -> Vec<Value> {
    Entries::of(value).map(Entry::into_value).collect()
}
