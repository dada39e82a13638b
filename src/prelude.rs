//! Re-exports commonly used items from this crate.
//!
//! This module is intended to be imported with a wildcard, providing
//! convenient access to the most frequently used traits and types.
//!
//! # Example
//!
//! ```
//! use lazyseq::prelude::*;
//! use serde_json::json;
//!
//! let doubled = wrap(json!([1, 2])).map(Callback::new(|v| json!(v.as_i64().unwrap_or(0) * 2)));
//! assert_eq!(doubled.value(), json!([2, 4]));
//! ```

pub use crate::chain::{ChainMode, Explicit, Implicit, Wrapper, wrap, wrap_serialize, wrap_with};
pub use crate::iteratee::{Callback, Context, Iteratee};
pub use crate::settings::{Evaluation, Settings};
pub use crate::traits::*;
