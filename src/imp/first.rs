use std::ops::ControlFlow;

use serde_json::Value;

use crate::{Collector, Entry};

/// A [`Collector`] that keeps the first value it sees and closes right away.
///
/// Backs `head` and, walking from the other end, `last`.
#[derive(Debug, Default, Clone)]
pub struct First {
    value: Option<Value>,
}

impl First {
    #[inline]
    pub const fn new() -> Self {
        Self { value: None }
    }
}

impl Collector for First {
    type Output = Option<Value>;

    #[inline]
    fn collect(&mut self, entry: Entry) -> ControlFlow<()> {
        if self.value.is_none() {
            self.value = Some(entry.value);
        }
        ControlFlow::Break(())
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        self.value
    }

    #[inline]
    fn break_hint(&self) -> bool {
        self.value.is_some()
    }
}
