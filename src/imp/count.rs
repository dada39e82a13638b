use std::ops::ControlFlow;

use serde_json::Value;

use crate::{Collector, Entry};

/// A [`Collector`] that counts the entries it receives. Backs `size`.
#[derive(Debug, Default, Clone)]
pub struct Count {
    count: usize,
}

impl Count {
    #[inline]
    pub const fn new() -> Self {
        Count { count: 0 }
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.count
    }
}

impl Collector for Count {
    type Output = Option<Value>;

    #[inline]
    fn collect(&mut self, _: Entry) -> ControlFlow<()> {
        self.count += 1;
        ControlFlow::Continue(())
    }

    #[inline]
    fn finish(self: Box<Self>) -> Self::Output {
        Some(self.count.into())
    }

    #[inline]
    fn collect_many(&mut self, entries: &mut dyn Iterator<Item = Entry>) -> ControlFlow<()> {
        self.count += entries.count();
        ControlFlow::Continue(())
    }
}
