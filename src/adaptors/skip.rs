use std::{fmt::Debug, ops::ControlFlow};

use crate::{Collector, Entry};

/// A [`Collector`] that skips the first `n` collected entries before it begins
/// accumulating them.
///
/// This `struct` is created by [`Collector::skip()`]. See its documentation for more.
pub struct Skip<C: ?Sized> {
    remaining: usize,
    collector: Box<C>,
}

impl<C: ?Sized> Skip<C> {
    pub(crate) fn new(collector: Box<C>, n: usize) -> Self {
        Self {
            collector,
            remaining: n,
        }
    }
}

impl<C: Collector + ?Sized> Collector for Skip<C> {
    type Output = C::Output;

    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        if self.remaining > 0 {
            self.remaining -= 1;

            // There is a very edge case that we've skipped enough entries,
            // but the underlying collector has stopped from the beginning.
            // The correct behavior in this case is to stop.
            if self.remaining == 0 && self.collector.break_hint() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        } else {
            self.collector.collect(entry)
        }
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

impl<C: Debug + ?Sized> Debug for Skip<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skip")
            .field("collector", &self.collector)
            .field("remaining", &self.remaining)
            .finish()
    }
}
