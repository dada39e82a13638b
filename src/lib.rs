//! Collection utilities over dynamic values, with a lazy chain that fuses its steps.
//!
//! Every utility works on a [`serde_json::Value`]: arrays, mappings and strings are
//! collections, anything else is an empty one. The [`eager`] module holds the plain
//! functions. [`wrap`] puts a value into a [`Wrapper`] that records steps and runs them
//! only when a result is asked for.
//!
//! # Motivation
//!
//! Suppose we have a couple of hundred numbers and want the first even square.
//! What would be our approach?
//!
//! - Approach 1: compose the utilities
//!
//! ```
//! use lazyseq::{Callback, eager};
//! use serde_json::{Value, json};
//!
//! let numbers = Value::from((1..=200).collect::<Vec<i64>>());
//! let square = Callback::new(|v| json!(v.as_i64().unwrap_or(0).pow(2)));
//! let even = Callback::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
//!
//! let squares = Value::from(eager::map(&numbers, square));
//! assert_eq!(eager::find(&squares, even), Some(json!(4)));
//! ```
//!
//! **Cons:** every one of the 200 numbers gets squared and an intermediate array is
//! allocated, only for the search to stop at the second element.
//!
//! - Approach 2: a wrapped sequence
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//!
//! use lazyseq::{Callback, wrap};
//! use serde_json::{Value, json};
//!
//! let calls = Rc::new(Cell::new(0));
//! let square = {
//!     let calls = Rc::clone(&calls);
//!     Callback::new(move |v| {
//!         calls.set(calls.get() + 1);
//!         json!(v.as_i64().unwrap_or(0).pow(2))
//!     })
//! };
//! let even = Callback::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
//!
//! let numbers = Value::from((1..=200).collect::<Vec<i64>>());
//! assert_eq!(wrap(numbers).map(square).find(even), Some(json!(4)));
//! assert_eq!(calls.get(), 2);
//! ```
//!
//! The map and the search run in one pass, element by element, and the pass ends as
//! soon as the answer is known. The same holds for `take`, `head`, `some`, `every` and
//! the other steps that only need part of their input.
//!
//! # Steps
//!
//! Each wrapper method appends a step and returns a new [`Wrapper`]; the one it was
//! called on is untouched, so a wrapper can be branched freely.
//!
//! ```
//! use lazyseq::{Callback, wrap};
//! use serde_json::json;
//!
//! let numbers = wrap(json!([1, 2, 3, 4, 5]));
//! let odd = Callback::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 1));
//!
//! let odds = numbers.filter(odd.clone());
//! let evens = numbers.reject(odd);
//!
//! assert_eq!(odds.take_right(2).value(), json!([3, 5]));
//! assert_eq!(evens.value(), json!([2, 4]));
//! assert_eq!(numbers.value(), json!([1, 2, 3, 4, 5]));
//! ```
//!
//! Steps like `map`, `filter`, `take` or `drop_while` are fused into a single pass.
//! Steps that need their whole input, like `group_by`, `sort_by` or the set operations,
//! materialize it first. A callback built with [`Callback::with_context`] is handed the
//! materialized input of its own step, never the original source.
//!
//! # Collector
//!
//! A fused pass drives a chain of [`Collector`]s. Each adaptor gets an [`Entry`] at a time
//! and answers with a [`ControlFlow`](std::ops::ControlFlow): `Break` means it will never
//! take another one, which is how the pass knows to stop. The same collectors can be
//! handed to [`Wrapper::collect_into`]:
//!
//! ```
//! use lazyseq::{ArraySink, Collector, wrap};
//! use serde_json::json;
//!
//! let firsts = wrap(json!([3, 1, 4, 1, 5])).collect_into(ArraySink::new().take(2));
//! assert_eq!(firsts, Some(json!([3, 1])));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod adaptors;
mod chain;
pub mod eager;
mod error;
mod imp;
mod iteratee;
mod plan;
pub mod prelude;
mod settings;
mod source;
mod step;
mod traits;
pub mod value;

#[cfg(test)]
mod test_utils;

pub use adaptors::*;
pub use chain::{ChainMode, Explicit, Implicit, Wrapper, wrap, wrap_serialize, wrap_with};
pub use error::{Error, Result};
pub use imp::*;
pub use iteratee::{Callback, Context, Iteratee};
pub use settings::{Evaluation, LARGE_ARRAY_SIZE, Settings};
pub use source::{Entry, elements};
pub use traits::*;
