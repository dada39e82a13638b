use std::{fmt::Debug, ops::ControlFlow};

use crate::{
    Callback, Collector, Entry,
    adaptors::{Invoker, Scope},
};

/// A [`Collector`] that accumulates entries as long as a predicate returns a truthy value.
///
/// This `struct` is created by [`Collector::take_while()`]. See its documentation for more.
pub struct TakeWhile<'a, C: ?Sized> {
    collector: Box<C>,
    invoker: Invoker<'a>,
}

impl<C: ?Sized> TakeWhile<'static, C> {
    pub(crate) fn new(collector: Box<C>, pred: Callback) -> Self {
        TakeWhile::scoped(collector, pred, Scope::detached())
    }
}

impl<'a, C: ?Sized> TakeWhile<'a, C> {
    pub(crate) fn scoped(collector: Box<C>, pred: Callback, scope: Scope<'a>) -> Self {
        Self {
            collector,
            invoker: Invoker::new(pred, scope),
        }
    }
}

impl<C: Collector + ?Sized> Collector for TakeWhile<'_, C> {
    type Output = C::Output;

    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        if self.invoker.test(&entry) {
            self.collector.collect(entry)
        } else {
            ControlFlow::Break(())
        }
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        self.collector.finish()
    }

    #[inline]
    fn break_hint(&self) -> bool {
        // Despite short-circuiting due to the predicate, we can't
        // do anything besides delegating to the underlying collector.
        self.collector.break_hint()
    }
}

impl<C: Debug + ?Sized> Debug for TakeWhile<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TakeWhile")
            .field("collector", &self.collector)
            .finish()
    }
}
