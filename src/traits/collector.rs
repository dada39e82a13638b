use std::ops::ControlFlow;

use crate::{Callback, Entry, Filter, Map, Skip, SkipWhile, Take, TakeWhile};

/// Consumes the entries of a sequence one at a time and produces a final output.
///
/// Every step of a lazy sequence is one of these wrapped around the next,
/// ending in a sink that builds the result. Entries are pushed in from the
/// front; any layer may answer [`Break(())`] to say it will take nothing more,
/// which stops the walk over the source.
///
/// # Implementing
///
/// A sink only needs [`collect`](Collector::collect) and
/// [`finish`](Collector::finish). `finish` takes a `Box<Self>` so a pipeline
/// built at runtime can be finished through a trait object.
///
/// ```
/// use std::ops::ControlFlow;
/// use lazyseq::{Collector, Entry, wrap};
/// use serde_json::{Value, json};
///
/// /// Joins string elements, stopping after a maximum length.
/// struct Concat {
///     out: String,
///     limit: usize,
/// }
///
/// impl Collector for Concat {
///     type Output = String;
///
///     fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
///         if let Value::String(s) = entry.value {
///             self.out.push_str(&s);
///         }
///         if self.out.len() >= self.limit {
///             ControlFlow::Break(())
///         } else {
///             ControlFlow::Continue(())
///         }
///     }
///
///     fn finish(self: Box<Self>) -> String {
///         self.out
///     }
/// }
///
/// let joined = wrap(json!(["ab", "cd", "ef", "gh"]))
///     .collect_into(Concat { out: String::new(), limit: 4 });
///
/// assert_eq!(joined, "abcd");
/// ```
///
/// [`Break(())`]: ControlFlow::Break
pub trait Collector {
    /// The result this collector yields, via the [`finish`](Collector::finish) method.
    type Output;

    /// Collects an entry and returns whether the collector is "closed":
    /// [`Break(())`] means it takes nothing more **right after** this call.
    ///
    /// [`Break(())`]: ControlFlow::Break
    fn collect(&mut self, entry: Entry) -> ControlFlow<()>;

    /// Consumes the collector and returns the accumulated result.
    fn finish(self: Box<Self>) -> Self::Output;

    /// Returns `true` if the collector is already closed before being fed.
    ///
    /// Callers check this before pulling the first entry, so that a closed
    /// pipeline (such as `take(0)`) never runs an upstream callback.
    #[inline]
    fn break_hint(&self) -> bool {
        false
    }

    /// Feeds entries until the iterator runs out or the collector closes.
    fn collect_many(&mut self, entries: &mut dyn Iterator<Item = Entry>) -> ControlFlow<()> {
        if self.break_hint() {
            return ControlFlow::Break(());
        }

        for entry in entries {
            self.collect(entry)?;
        }
        ControlFlow::Continue(())
    }

    /// Keeps only the first `n` entries, then closes.
    ///
    /// ```
    /// use lazyseq::{ArraySink, Collector, Entry};
    /// use serde_json::json;
    ///
    /// let mut collector = ArraySink::new().take(2);
    ///
    /// assert!(collector.collect(Entry::new(json!(1))).is_continue());
    /// assert!(collector.collect(Entry::new(json!(2))).is_break());
    ///
    /// assert_eq!(Box::new(collector).finish(), Some(json!([1, 2])));
    /// ```
    #[inline]
    fn take(self, n: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(Box::new(self), n)
    }

    /// Discards the first `n` entries.
    #[inline]
    fn skip(self, n: usize) -> Skip<Self>
    where
        Self: Sized,
    {
        Skip::new(Box::new(self), n)
    }

    /// Transforms every entry's value before collecting it.
    #[inline]
    fn map(self, f: Callback) -> Map<'static, Self>
    where
        Self: Sized,
    {
        Map::new(Box::new(self), f)
    }

    /// Collects only the entries whose value passes `pred`.
    #[inline]
    fn filter(self, pred: Callback) -> Filter<'static, Self>
    where
        Self: Sized,
    {
        Filter::new(Box::new(self), pred)
    }

    /// Collects entries while `pred` holds, then closes.
    #[inline]
    fn take_while(self, pred: Callback) -> TakeWhile<'static, Self>
    where
        Self: Sized,
    {
        TakeWhile::new(Box::new(self), pred)
    }

    /// Discards entries while `pred` holds, then collects the rest.
    #[inline]
    fn skip_while(self, pred: Callback) -> SkipWhile<'static, Self>
    where
        Self: Sized,
    {
        SkipWhile::new(Box::new(self), pred)
    }
}
