use std::ops::ControlFlow;

use serde_json::Value;

use crate::{Collector, Entry};

/// A [`Collector`] that gathers entry values into an array.
/// Its [`Output`](Collector::Output) is always `Some(Value::Array(..))`.
///
/// This is the sink of every sequence whose result is array shaped.
#[derive(Debug, Default, Clone)]
pub struct ArraySink {
    items: Vec<Value>,
}

impl ArraySink {
    #[inline]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }
}

impl Collector for ArraySink {
    type Output = Option<Value>;

    #[inline]
    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        self.items.push(entry.value);
        ControlFlow::Continue(())
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        Some(Value::Array(self.items))
    }

    fn collect_many(&mut self, entries: &mut dyn Iterator<Item = Entry>) -> ControlFlow<()> {
        self.items.extend(entries.map(Entry::into_value));
        ControlFlow::Continue(())
    }
}
