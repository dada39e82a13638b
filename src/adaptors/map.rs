use std::{fmt::Debug, ops::ControlFlow};

use crate::{
    Callback, Collector, Entry,
    adaptors::{Invoker, Scope},
};

/// A [`Collector`] that transforms each entry's value before collecting it.
///
/// This `struct` is created by [`Collector::map()`]. See its documentation for more.
pub struct Map<'a, C: ?Sized> {
    collector: Box<C>,
    invoker: Invoker<'a>,
    // Set for `map_values` over unkeyed input: entries are keyed by position.
    rekey: bool,
}

impl<C: ?Sized> Map<'static, C> {
    pub(crate) fn new(collector: Box<C>, f: Callback) -> Self {
        Map::scoped(collector, f, Scope::detached(), false)
    }
}

impl<'a, C: ?Sized> Map<'a, C> {
    pub(crate) fn scoped(collector: Box<C>, f: Callback, scope: Scope<'a>, rekey: bool) -> Self {
        Self {
            collector,
            invoker: Invoker::new(f, scope),
            rekey,
        }
    }
}

impl<C: Collector + ?Sized> Collector for Map<'_, C> {
    type Output = C::Output;

    #[inline]
    fn collect(&mut self, mut entry: Entry) -> ControlFlow<()> {
        let position = self.invoker.position();
        entry.value = self.invoker.call(&entry);
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

impl<C: Debug + ?Sized> Debug for Map<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("collector", &self.collector)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        ArraySink, Callback, Collector, ObjectSink,
        adaptors::Scope,
        test_utils::{Counter, feed, square},
    };

    use super::Map;

    #[test]
    fn maps_every_entry() {
        let (output, pulled) = feed(ArraySink::new().map(Callback::new(square)), [1, 2, 3]);
        assert_eq!(output, Some(json!([1, 4, 9])));
        assert_eq!(pulled, 3);
    }

    #[test]
    fn closed_downstream_is_not_mapped() {
        let counter = Counter::default();
        let collector = ArraySink::new().take(0).map(counter.callback(square));
        let (output, pulled) = feed(collector, 0..10);

        assert_eq!(output, Some(json!([])));
        assert_eq!(pulled, 0);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn rekeys_unkeyed_input_by_position() {
        let input = json!([5, 6]);
        let scope = Scope {
            collection: &input,
            keyed: false,
        };
        let collector = Map::scoped(Box::new(ObjectSink::new()), Callback::new(square), scope, true);
        let (output, _) = feed(collector, [5, 6]);

        assert_eq!(output, Some(json!({ "0": 25, "1": 36 })));
    }
}
