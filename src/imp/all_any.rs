use std::{fmt::Debug, ops::ControlFlow};

use serde_json::Value;

use crate::{
    Callback, Collector, Entry,
    adaptors::{Invoker, Scope},
};

/// Shared state of [`Any`] and [`All`].
///
/// `DEFAULT` is the answer while nothing has decided it: `false` for "any",
/// `true` for "all". The first entry whose predicate result differs from
/// `DEFAULT` flips the answer and closes the collector.
pub struct AllAny<'a, const DEFAULT: bool> {
    invoker: Invoker<'a>,
    result: bool,
}

/// A [`Collector`] that tests whether any value satisfies a predicate.
/// Backs `some`.
pub type Any<'a> = AllAny<'a, false>;

/// A [`Collector`] that tests whether every value satisfies a predicate.
/// Backs `every`.
pub type All<'a> = AllAny<'a, true>;

impl<const DEFAULT: bool> AllAny<'static, DEFAULT> {
    #[inline]
    pub fn new(pred: Callback) -> Self {
        AllAny::scoped(pred, Scope::detached())
    }
}

impl<'a, const DEFAULT: bool> AllAny<'a, DEFAULT> {
    pub(crate) fn scoped(pred: Callback, scope: Scope<'a>) -> Self {
        Self {
            invoker: Invoker::new(pred, scope),
            result: DEFAULT,
        }
    }

    /// Returns the current result of the accumulation.
    #[inline]
    pub const fn get(&self) -> bool {
        self.result
    }
}

impl<const DEFAULT: bool> Collector for AllAny<'_, DEFAULT> {
    type Output = Option<Value>;

    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        if self.result != DEFAULT {
            return ControlFlow::Break(());
        }

        if self.invoker.test(&entry) == DEFAULT {
            ControlFlow::Continue(())
        } else {
            self.result = !DEFAULT;
            ControlFlow::Break(())
        }
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        Some(Value::Bool(self.result))
    }

    #[inline]
    fn break_hint(&self) -> bool {
        self.result != DEFAULT
    }
}

impl<const DEFAULT: bool> Debug for AllAny<'_, DEFAULT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(if DEFAULT { "All" } else { "Any" })
            .field("result", &self.result)
            .finish()
    }
}

#[cfg(test)]
mod proptests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;
    use serde_json::json;

    use crate::{All, Any, test_utils::{Counter, feed, is_even}};

    proptest! {
        #[test]
        fn matches_iterator(nums in propvec(0..10_i64, ..20)) {
            let any_counter = Counter::default();
            let (any, _) = feed(Any::new(any_counter.predicate(is_even)), nums.clone());
            let all_counter = Counter::default();
            let (all, _) = feed(All::new(all_counter.predicate(is_even)), nums.clone());

            prop_assert_eq!(any, Some(json!(nums.iter().any(|n| n % 2 == 0))));
            prop_assert_eq!(all, Some(json!(nums.iter().all(|n| n % 2 == 0))));

            let until_even = nums.iter().position(|n| n % 2 == 0).map_or(nums.len(), |i| i + 1);
            let until_odd = nums.iter().position(|n| n % 2 != 0).map_or(nums.len(), |i| i + 1);
            prop_assert_eq!(any_counter.get(), until_even);
            prop_assert_eq!(all_counter.get(), until_odd);
        }
    }
}
