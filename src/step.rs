use std::{fmt::Debug, rc::Rc};

use serde_json::Value;

use crate::{
    Callback, Settings,
    imp::Reducer,
    iteratee::Needs,
};

/// A step that can be fused into a single pass with its neighbours.
#[derive(Debug, Clone)]
pub(crate) enum Stage {
    Map(Callback),
    /// `filter`, `reject` and `compact`.
    Filter {
        pred: Callback,
        keep: bool,
    },
    MapValues(Callback),
    /// `pick_by` and `omit_by`.
    PickBy {
        pred: Callback,
        keep: bool,
    },
    Take(usize),
    Drop(usize),
    TakeWhile(Callback),
    DropWhile(Callback),
}

impl Stage {
    pub(crate) fn needs(&self) -> Needs {
        match self {
            Self::Map(f) | Self::MapValues(f) | Self::TakeWhile(f) | Self::DropWhile(f) => {
                f.needs()
            }
            Self::Filter { pred, .. } | Self::PickBy { pred, .. } => pred.needs(),
            Self::Take(_) | Self::Drop(_) => Needs::Value,
        }
    }

    /// Whether each output depends only on its own input element, so the
    /// stage gives the same results whichever end the walk starts from.
    pub(crate) fn is_elementwise(&self) -> bool {
        matches!(
            self,
            Self::Map(_) | Self::Filter { .. } | Self::MapValues(_) | Self::PickBy { .. }
        )
    }

    /// Whether the stage's output is a mapping.
    pub(crate) fn is_keyed(&self) -> bool {
        matches!(self, Self::MapValues(_) | Self::PickBy { .. })
    }
}

/// A step that produces a single value and closes its pass.
#[derive(Clone)]
pub(crate) enum Terminal {
    Find(Callback),
    Head,
    Size,
    Some(Callback),
    Every(Callback),
    Fold {
        accum: Option<Value>,
        f: Reducer,
    },
}

impl Terminal {
    pub(crate) fn needs(&self) -> Needs {
        match self {
            Self::Find(pred) | Self::Some(pred) | Self::Every(pred) => pred.needs(),
            Self::Head | Self::Size | Self::Fold { .. } => Needs::Value,
        }
    }
}

impl Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Find(pred) => f.debug_tuple("Find").field(pred).finish(),
            Self::Head => f.write_str("Head"),
            Self::Size => f.write_str("Size"),
            Self::Some(pred) => f.debug_tuple("Some").field(pred).finish(),
            Self::Every(pred) => f.debug_tuple("Every").field(pred).finish(),
            Self::Fold { accum, .. } => f.debug_struct("Fold").field("accum", accum).finish(),
        }
    }
}

type Apply = dyn Fn(&Value, &Settings) -> Option<Value>;

/// A step computed on its whole input at once, by an eager utility.
///
/// `None` stands for a missing result, such as `find_last` finding nothing.
#[derive(Clone)]
pub(crate) struct Barrier {
    pub(crate) name: &'static str,
    apply: Rc<Apply>,
}

impl Barrier {
    pub(crate) fn new(
        name: &'static str,
        apply: impl Fn(&Value, &Settings) -> Option<Value> + 'static,
    ) -> Self {
        Self {
            name,
            apply: Rc::new(apply),
        }
    }

    /// A barrier producing a collection, which is never missing.
    pub(crate) fn collection<T: Into<Value>>(
        name: &'static str,
        apply: impl Fn(&Value, &Settings) -> T + 'static,
    ) -> Self {
        Self::new(name, move |input, settings| Some(apply(input, settings).into()))
    }

    #[inline]
    pub(crate) fn apply(&self, input: &Value, settings: &Settings) -> Option<Value> {
        (self.apply)(input, settings)
    }
}

impl Debug for Barrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Barrier").field(&self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Stage(Stage),
    Reverse,
    Barrier(Barrier),
    Terminal(Terminal),
}

/// A node of the persistent step list. Appending shares the prefix, so
/// sequences branched from one handle never see each other's steps.
#[derive(Debug)]
pub(crate) struct StepNode {
    step: Step,
    prev: Option<Rc<StepNode>>,
}

/// The steps appended so far, newest first.
pub(crate) type Steps = Option<Rc<StepNode>>;

pub(crate) fn push(steps: &Steps, step: Step) -> Steps {
    Some(Rc::new(StepNode {
        step,
        prev: steps.clone(),
    }))
}

/// The steps in the order they were appended.
pub(crate) fn in_order(steps: &Steps) -> Vec<&Step> {
    let mut out = Vec::new();
    let mut node = steps.as_deref();
    while let Some(current) = node {
        out.push(&current.step);
        node = current.prev.as_deref();
    }
    out.reverse();
    out
}
