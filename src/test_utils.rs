use std::{cell::Cell, rc::Rc};

use serde_json::{Value, json};

use crate::{Callback, Collector, Entry};

/// Pushes `values` into `collector` the way a sequence drives a run, and
/// returns the output with the number of entries actually pulled.
pub fn feed<C: Collector>(
    collector: C,
    values: impl IntoIterator<Item = impl Into<Value>>,
) -> (C::Output, usize) {
    let mut collector = Box::new(collector);
    let mut pulled = 0;

    if !collector.break_hint() {
        let _ = values.into_iter().try_for_each(|value| {
            pulled += 1;
            collector.collect(Entry::new(value.into()))
        });
    }

    (collector.finish(), pulled)
}

/// Counts how many times the callbacks it hands out are invoked.
#[derive(Debug, Default, Clone)]
pub struct Counter {
    calls: Rc<Cell<usize>>,
}

impl Counter {
    pub fn callback(&self, f: fn(&Value) -> Value) -> Callback {
        let calls = Rc::clone(&self.calls);
        Callback::new(move |v| {
            calls.set(calls.get() + 1);
            f(v)
        })
    }

    pub fn predicate(&self, f: fn(&Value) -> bool) -> Callback {
        let calls = Rc::clone(&self.calls);
        Callback::predicate(move |v| {
            calls.set(calls.get() + 1);
            f(v)
        })
    }

    pub fn get(&self) -> usize {
        self.calls.get()
    }
}

pub fn square(value: &Value) -> Value {
    match value.as_i64() {
        Some(n) => json!(n * n),
        None => json!(value.as_f64().unwrap_or(f64::NAN).powi(2)),
    }
}

pub fn is_even(value: &Value) -> bool {
    match value.as_i64() {
        Some(n) => n % 2 == 0,
        None => value.as_f64().is_some_and(|n| n % 2.0 == 0.0),
    }
}

/// `[start, end)` as a JSON array.
pub fn range(start: i64, end: i64) -> Value {
    Value::from((start..end).collect::<Vec<_>>())
}
