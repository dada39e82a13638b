mod filter;
mod map;
mod skip;
mod skip_while;
mod take;
mod take_while;

pub use filter::*;
pub use map::*;
pub use skip::*;
pub use skip_while::*;
pub use take::*;
pub use take_while::*;

use serde_json::Value;

use crate::{Callback, Entry, source::is_keyed};

static NO_COLLECTION: Value = Value::Null;

/// The input a step runs over, as seen by its callbacks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    /// The materialized input, handed to callbacks that ask for it.
    pub(crate) collection: &'a Value,
    /// Whether entry keys are meaningful for this input.
    pub(crate) keyed: bool,
}

impl<'a> Scope<'a> {
    /// The scope of a step whose input is `collection`.
    pub(crate) fn of(collection: &'a Value) -> Self {
        Self {
            collection,
            keyed: is_keyed(collection),
        }
    }
}

impl Scope<'static> {
    /// A scope for collectors assembled by hand, outside of a sequence.
    pub(crate) fn detached() -> Self {
        Self {
            collection: &NO_COLLECTION,
            keyed: true,
        }
    }
}

/// A callback bound to its step's input, counting the entries it has seen.
#[derive(Debug, Clone)]
pub(crate) struct Invoker<'a> {
    callback: Callback,
    index: usize,
    scope: Scope<'a>,
}

impl<'a> Invoker<'a> {
    pub(crate) fn new(callback: Callback, scope: Scope<'a>) -> Self {
        Self {
            callback,
            index: 0,
            scope,
        }
    }

    /// Position of the next entry in the step's input.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn call(&mut self, entry: &Entry) -> Value {
        let out = self.call_at(self.index, entry);
        self.index += 1;
        out
    }

    /// Calls the callback as if `entry` sat at `index`, without advancing.
    #[inline]
    pub(crate) fn call_at(&self, index: usize, entry: &Entry) -> Value {
        let key = entry.key.as_deref().filter(|_| self.scope.keyed);
        self.callback
            .call(&entry.value, index, key, self.scope.collection)
    }

    #[inline]
    pub(crate) fn test_at(&self, index: usize, entry: &Entry) -> bool {
        crate::value::is_truthy(&self.call_at(index, entry))
    }

    #[inline]
    pub(crate) fn test(&mut self, entry: &Entry) -> bool {
        crate::value::is_truthy(&self.call(entry))
    }
}
