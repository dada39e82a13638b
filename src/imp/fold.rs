use std::{fmt::Debug, ops::ControlFlow, rc::Rc};

use serde_json::Value;

use crate::{Collector, Entry};

/// The accumulator function of a `reduce`.
pub(crate) type Reducer = Rc<dyn Fn(Value, &Value) -> Value>;

/// A [`Collector`] that folds every value into an accumulator. Backs `reduce`.
///
/// Without an initial accumulator the first value seeds it, and an empty
/// input folds to `None`.
pub struct Fold {
    accum: Option<Value>,
    f: Reducer,
}

impl Fold {
    #[inline]
    pub fn new(accum: Value, f: impl Fn(Value, &Value) -> Value + 'static) -> Self {
        Self::shared(Some(accum), Rc::new(f))
    }

    /// Folds starting from the first value instead of an initial accumulator.
    #[inline]
    pub fn from_first(f: impl Fn(Value, &Value) -> Value + 'static) -> Self {
        Self::shared(None, Rc::new(f))
    }

    #[inline]
    pub(crate) fn shared(accum: Option<Value>, f: Reducer) -> Self {
        Fold { accum, f }
    }
}

impl Collector for Fold {
    type Output = Option<Value>;

    #[inline]
    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        self.accum = Some(match self.accum.take() {
            Some(accum) => (self.f)(accum, &entry.value),
            None => entry.value,
        });
        ControlFlow::Continue(())
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        self.accum
    }
}

impl Debug for Fold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fold").field("accum", &self.accum).finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{Fold, test_utils::feed};

    fn add(acc: Value, v: &Value) -> Value {
        json!(acc.as_i64().unwrap_or(0) + v.as_i64().unwrap_or(0))
    }

    #[test]
    fn sums() {
        assert_eq!(feed(Fold::new(json!(0), add), 1..=4), (Some(json!(10)), 4));
        assert_eq!(feed(Fold::new(json!(5), add), Vec::<i32>::new()), (Some(json!(5)), 0));
    }

    #[test]
    fn first_value_seeds() {
        assert_eq!(feed(Fold::from_first(add), [3, 4]).0, Some(json!(7)));
        assert_eq!(feed(Fold::from_first(add), Vec::<i32>::new()).0, None);
    }
}
