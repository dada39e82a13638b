use std::{fmt::Debug, ops::ControlFlow};

use crate::{Collector, Entry};

/// A [`Collector`] that stops accumulating after collecting the first `n` entries.
///
/// This is what makes a lazy sequence short-circuit: once the quota is met it
/// answers [`Break`](ControlFlow::Break), and the walk over the source ends
/// no matter how many steps sit upstream.
///
/// This `struct` is created by [`Collector::take()`]. See its documentation for more.
pub struct Take<C: ?Sized> {
    // Unspecified if the underlying collector stops accumulating.
    remaining: usize,
    collector: Box<C>,
}

impl<C: ?Sized> Take<C> {
    pub(crate) fn new(collector: Box<C>, n: usize) -> Self {
        Self {
            collector,
            remaining: n,
        }
    }
}

impl<C: Collector + ?Sized> Collector for Take<C> {
    type Output = C::Output;

    #[inline]
    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        // Must NOT remove it. The caller may feed a `take(0)` without
        // consulting `break_hint` first.
        if self.remaining == 0 {
            return ControlFlow::Break(());
        }

        self.remaining -= 1;
        let cf = self.collector.collect(entry);

        if self.remaining == 0 {
            ControlFlow::Break(())
        } else {
            cf
        }
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        self.collector.finish()
    }

    #[inline]
    fn break_hint(&self) -> bool {
        self.remaining == 0 || self.collector.break_hint()
    }
}

impl<C: Debug + ?Sized> Debug for Take<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Take")
            .field("collector", &self.collector)
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod proptests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;
    use serde_json::json;

    use crate::{ArraySink, Callback, Collector, test_utils::{Counter, feed, is_even, square}};

    proptest! {
        #[test]
        fn matches_iterator_take(
            nums in propvec(any::<i32>(), ..100),
            take_count in ..150_usize,
        ) {
            let (output, pulled) = feed(ArraySink::new().take(take_count), nums.clone());
            let expected: Vec<_> = nums.iter().copied().take(take_count).collect();

            prop_assert_eq!(output, Some(json!(expected)));
            prop_assert_eq!(pulled, take_count.min(nums.len()));
        }

        #[test]
        fn upstream_runs_only_for_needed_entries(
            nums in propvec(-1000..1000_i64, ..100),
            take_count in ..20_usize,
        ) {
            let counter = Counter::default();
            let collector = ArraySink::new()
                .take(take_count)
                .filter(Callback::predicate(is_even))
                .map(counter.callback(square));
            let (output, _) = feed(collector, nums.clone());

            let needed = if take_count == 0 {
                0
            } else {
                nums.iter()
                    .position({
                        let mut found = 0;
                        move |n| {
                            found += usize::from(n % 2 == 0);
                            found == take_count
                        }
                    })
                    .map_or(nums.len(), |i| i + 1)
            };
            let expected: Vec<_> = nums
                .iter()
                .map(|n| n * n)
                .filter(|n| n % 2 == 0)
                .take(take_count)
                .collect();

            prop_assert_eq!(output, Some(json!(expected)));
            prop_assert_eq!(counter.get(), needed);
        }
    }
}
