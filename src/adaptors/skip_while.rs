use std::{fmt::Debug, ops::ControlFlow};

use crate::{
    Callback, Collector, Entry,
    adaptors::{Invoker, Scope},
};

/// A [`Collector`] that discards entries while a predicate holds, then
/// collects everything after.
///
/// This `struct` is created by [`Collector::skip_while()`]. See its documentation for more.
pub struct SkipWhile<'a, C: ?Sized> {
    collector: Box<C>,
    // `None` once the predicate has failed.
    invoker: Option<Invoker<'a>>,
}

impl<C: ?Sized> SkipWhile<'static, C> {
    pub(crate) fn new(collector: Box<C>, pred: Callback) -> Self {
        SkipWhile::scoped(collector, pred, Scope::detached())
    }
}

impl<'a, C: ?Sized> SkipWhile<'a, C> {
    pub(crate) fn scoped(collector: Box<C>, pred: Callback, scope: Scope<'a>) -> Self {
        Self {
            collector,
            invoker: Some(Invoker::new(pred, scope)),
        }
    }
}

impl<C: Collector + ?Sized> Collector for SkipWhile<'_, C> {
    type Output = C::Output;

    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        if let Some(invoker) = &mut self.invoker {
            if invoker.test(&entry) {
                return ControlFlow::Continue(());
            }
            self.invoker = None;
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

impl<C: Debug + ?Sized> Debug for SkipWhile<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkipWhile")
            .field("collector", &self.collector)
            .field("skipping", &self.invoker.is_some())
            .finish()
    }
}
