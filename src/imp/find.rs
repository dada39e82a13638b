use std::{fmt::Debug, ops::ControlFlow};

use serde_json::Value;

use crate::{
    Callback, Collector, Entry,
    adaptors::{Invoker, Scope},
};

/// A [`Collector`] that searches for the first value satisfying a predicate.
///
/// If no matching value has been found, its [`Output`] is `None`.
/// When the collector encounters a value that makes the predicate truthy,
/// it returns [`Break`], and the [`Output`] becomes `Some` containing that value.
///
/// # Examples
///
/// ```
/// use lazyseq::{Callback, Collector, Entry, Find};
/// use serde_json::json;
///
/// let mut collector = Find::new(Callback::predicate(|v| v.as_i64() == Some(6)));
///
/// assert!(collector.collect(Entry::new(json!(1))).is_continue());
///
/// // Found!
/// assert!(collector.collect(Entry::new(json!(6))).is_break());
///
/// assert_eq!(Box::new(collector).finish(), Some(json!(6)));
/// ```
///
/// [`Break`]: std::ops::ControlFlow::Break
/// [`Output`]: Collector::Output
pub struct Find<'a> {
    state: State<'a>,
}

enum State<'a> {
    Searching(Invoker<'a>),
    Found(Value),
}

impl Find<'static> {
    /// Creates an instance of this collector with a given predicate.
    #[inline]
    pub fn new(pred: Callback) -> Self {
        Find::scoped(pred, Scope::detached())
    }
}

impl<'a> Find<'a> {
    pub(crate) fn scoped(pred: Callback, scope: Scope<'a>) -> Self {
        Self {
            state: State::Searching(Invoker::new(pred, scope)),
        }
    }
}

impl Collector for Find<'_> {
    type Output = Option<Value>;

    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        if let State::Searching(ref mut pred) = self.state {
            if pred.test(&entry) {
                self.state = State::Found(entry.value);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        } else {
            ControlFlow::Break(())
        }
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        if let State::Found(value) = self.state {
            Some(value)
        } else {
            None
        }
    }

    #[inline]
    fn break_hint(&self) -> bool {
        matches!(self.state, State::Found(_))
    }
}

impl Debug for Find<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let found = if let State::Found(ref value) = self.state {
            Some(value)
        } else {
            None
        };

        f.debug_struct("Find").field("found", &found).finish()
    }
}
