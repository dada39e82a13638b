use std::{fmt::Debug, ops::ControlFlow};

use crate::{
    Callback, Collector, Entry,
    adaptors::{Invoker, Scope},
};

/// A [`Collector`] that only collects the entries a predicate accepts.
///
/// The same adaptor backs `filter`, `reject` (inverted) and `pick_by` /
/// `omit_by` (which keep entry keys). It never closes on its own: a rejected
/// entry is just skipped.
///
/// This `struct` is created by [`Collector::filter()`]. See its documentation for more.
pub struct Filter<'a, C: ?Sized> {
    collector: Box<C>,
    invoker: Invoker<'a>,
    keep: bool,
    rekey: bool,
}

impl<C: ?Sized> Filter<'static, C> {
    pub(crate) fn new(collector: Box<C>, pred: Callback) -> Self {
        Filter::scoped(collector, pred, Scope::detached(), true, false)
    }
}

impl<'a, C: ?Sized> Filter<'a, C> {
    pub(crate) fn scoped(
        collector: Box<C>,
        pred: Callback,
        scope: Scope<'a>,
        keep: bool,
        rekey: bool,
    ) -> Self {
        Self {
            collector,
            invoker: Invoker::new(pred, scope),
            keep,
            rekey,
        }
    }
}

impl<C: Collector + ?Sized> Collector for Filter<'_, C> {
    type Output = C::Output;

    #[inline]
    fn collect(&mut self, mut entry: Entry) -> ControlFlow<()> {
        let position = self.invoker.position();
        if self.invoker.test(&entry) != self.keep {
            return ControlFlow::Continue(());
        }

        if self.rekey {
            entry.key = Some(position.to_string());
        }
        self.collector.collect(entry)
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        self.collector.finish()
    }

    #[inline]
    fn break_hint(&self) -> bool {
        self.collector.break_hint()
    }
}

impl<C: Debug + ?Sized> Debug for Filter<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("collector", &self.collector)
            .field("keep", &self.keep)
            .finish()
    }
}

#[cfg(test)]
mod proptests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use crate::{
        ArraySink, Callback, Collector,
        adaptors::Scope,
        test_utils::{feed, is_even},
    };

    use super::Filter;

    proptest! {
        #[test]
        fn filter_and_reject_partition(nums in propvec(any::<i32>(), ..100)) {
            let (kept, _) = feed(ArraySink::new().filter(Callback::predicate(is_even)), nums.clone());
            let input = Value::from(nums.clone());
            let scope = Scope { collection: &input, keyed: false };
            let rejected = Filter::scoped(
                Box::new(ArraySink::new()),
                Callback::predicate(is_even),
                scope,
                false,
                false,
            );
            let (rejected, _) = feed(rejected, nums.clone());

            let expected_kept: Vec<_> = nums.iter().filter(|n| *n % 2 == 0).copied().collect();
            let expected_rejected: Vec<_> = nums.iter().filter(|n| *n % 2 != 0).copied().collect();
            prop_assert_eq!(kept, Some(json!(expected_kept)));
            prop_assert_eq!(rejected, Some(json!(expected_rejected)));
        }
    }

    #[test]
    fn predicate_sees_its_input_as_collection() {
        let input = json!([0]);
        let scope = Scope { collection: &input, keyed: false };
        let pred = Callback::with_context(|_, ctx| json!(ctx.collection == &json!([0])));
        let collector = Filter::scoped(Box::new(ArraySink::new()), pred, scope, true, false);

        assert_eq!(feed(collector, [0]).0, Some(json!([0])));
    }
}
