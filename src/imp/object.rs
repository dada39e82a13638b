use std::ops::ControlFlow;

use serde_json::{Map, Value};

use crate::{Collector, Entry};

/// A [`Collector`] that gathers entries into a mapping, keyed by entry key.
///
/// Entries without a key are stored under their position. A repeated key
/// overwrites the earlier value but keeps its original place.
#[derive(Debug, Default, Clone)]
pub struct ObjectSink {
    map: Map<String, Value>,
    position: usize,
}

impl ObjectSink {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Collector for ObjectSink {
    type Output = Option<Value>;

    #[inline]
    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        let key = entry.key.unwrap_or_else(|| self.position.to_string());
        self.position += 1;
        self.map.insert(key, entry.value);
        ControlFlow::Continue(())
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        Some(Value::Object(self.map))
    }
}
