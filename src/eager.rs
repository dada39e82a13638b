//! Plain functions over [`Value`] collections, each running to completion in
//! a single call.
//!
//! These are what a lazy sequence computes: every chain step has an eager
//! counterpart here with the same name, and barrier steps (such as
//! `group_by` or `xor`) are evaluated by calling them on the materialized
//! intermediate.
//!
//! All functions read their inputs through a shared reference and return
//! fresh values. A collection that is not an array, a mapping or a string is
//! treated as empty.
//!
//! ```
//! use lazyseq::eager;
//! use serde_json::json;
//!
//! let numbers = json!([6.1, 4.2, 6.3]);
//! let floor = lazyseq::Callback::new(|v| json!(v.as_f64().unwrap_or(0.0).floor()));
//!
//! assert_eq!(
//!     serde_json::Value::Object(eager::group_by(&numbers, floor)),
//!     json!({ "6": [6.1, 6.3], "4": [4.2] }),
//! );
//! ```

mod iteration;
mod sets;
mod slicing;
mod structure;

pub use iteration::*;
pub use sets::*;
pub use slicing::*;
pub use structure::*;

pub(crate) use sets::SetOps;

use serde_json::Value;

use crate::{
    Iteratee,
    adaptors::{Invoker, Scope},
};

/// Binds an iteratee to the collection it walks.
fn invoker(collection: &Value, iteratee: impl Into<Iteratee>) -> Invoker<'_> {
    Invoker::new(iteratee.into().resolve(), Scope::of(collection))
}
