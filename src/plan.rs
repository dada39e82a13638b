use std::borrow::Cow;

use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    All, Any, ArraySink, Collector, Count, Filter, Find, First, Fold, Map, ObjectSink, Settings,
    Skip, SkipWhile, Take, TakeWhile,
    adaptors::Scope,
    eager,
    iteratee::Needs,
    settings::Evaluation,
    source::{Entries, is_keyed},
    step::{Barrier, Stage, Step, Terminal},
};

/// A pipeline built for one run, ending in whatever sink the run feeds.
type Pipeline<'a, O> = Box<dyn Collector<Output = O> + 'a>;

enum Layer {
    Stage(Stage),
    /// A reverse folded into the walk direction. The shape turns into an
    /// array from here on.
    Unkey,
}

/// Consecutive steps evaluated in one pass over their input.
#[derive(Default)]
struct Run {
    reversed: bool,
    layers: Vec<Layer>,
    terminal: Option<Terminal>,
}

impl Run {
    fn is_empty(&self) -> bool {
        !self.reversed && self.layers.is_empty() && self.terminal.is_none()
    }

    /// Whether a reverse can flip the walk instead of materializing: every
    /// layer so far must give the same outputs in either order.
    fn can_flip(&self) -> bool {
        self.layers.iter().all(|layer| match layer {
            Layer::Stage(stage) => stage.is_elementwise() && stage.needs() == Needs::Value,
            Layer::Unkey => true,
        })
    }

    /// Wraps `sink` in the run's stages, last stage innermost.
    fn pipeline<'a, O: 'a>(&self, input: &'a Value, sink: Pipeline<'a, O>) -> Pipeline<'a, O> {
        let mut keyed = is_keyed(input);
        let mut scoped = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            match layer {
                Layer::Stage(stage) => {
                    scoped.push((stage, Scope { collection: input, keyed }));
                    keyed = stage.is_keyed();
                }
                Layer::Unkey => keyed = false,
            }
        }

        scoped
            .into_iter()
            .rev()
            .fold(sink, |pipeline, (stage, scope)| -> Pipeline<'a, O> {
                let rekey = !scope.keyed;
                match stage {
                    Stage::Map(f) => Box::new(Map::scoped(pipeline, f.clone(), scope, false)),
                    Stage::MapValues(f) => Box::new(Map::scoped(pipeline, f.clone(), scope, rekey)),
                    Stage::Filter { pred, keep } => {
                        Box::new(Filter::scoped(pipeline, pred.clone(), scope, *keep, false))
                    }
                    Stage::PickBy { pred, keep } => {
                        Box::new(Filter::scoped(pipeline, pred.clone(), scope, *keep, rekey))
                    }
                    Stage::Take(n) => Box::new(Take::new(pipeline, *n)),
                    Stage::Drop(n) => Box::new(Skip::new(pipeline, *n)),
                    Stage::TakeWhile(pred) => {
                        Box::new(TakeWhile::scoped(pipeline, pred.clone(), scope))
                    }
                    Stage::DropWhile(pred) => {
                        Box::new(SkipWhile::scoped(pipeline, pred.clone(), scope))
                    }
                }
            })
    }

    /// Whether the last layer outputs a mapping.
    fn keyed_after(&self, input: &Value) -> bool {
        self.layers.last().map_or(is_keyed(input), |layer| {
            matches!(layer, Layer::Stage(stage) if stage.is_keyed())
        })
    }

    /// The sink of a run that ends in a terminal step. Its callback sees
    /// the terminal's own input, which is the whole run input only when the
    /// terminal is the first layer.
    fn terminal_sink<'a>(&self, terminal: &Terminal, input: &'a Value) -> Pipeline<'a, Option<Value>> {
        let scope = Scope {
            collection: input,
            keyed: self.keyed_after(input),
        };
        match terminal {
            Terminal::Find(pred) => Box::new(Find::scoped(pred.clone(), scope)),
            Terminal::Head => Box::new(First::new()),
            Terminal::Size => Box::new(Count::new()),
            Terminal::Some(pred) => Box::new(Any::scoped(pred.clone(), scope)),
            Terminal::Every(pred) => Box::new(All::scoped(pred.clone(), scope)),
            Terminal::Fold { accum, f } => Box::new(Fold::shared(accum.clone(), f.clone())),
        }
    }

    fn evaluate(&self, input: &Value) -> Option<Value> {
        let sink: Pipeline<'_, Option<Value>> = match &self.terminal {
            Some(terminal) => self.terminal_sink(terminal, input),
            None if self.keyed_after(input) => Box::new(ObjectSink::new()),
            None => Box::new(ArraySink::new()),
        };
        self.drive(input, sink)
    }

    fn drive<'a, O: 'a>(&self, input: &'a Value, sink: Pipeline<'a, O>) -> O {
        let mut pipeline = self.pipeline(input, sink);
        let mut pulled = 0_usize;

        if !pipeline.break_hint() {
            let _ = Entries::walk(input, self.reversed).try_for_each(|entry| {
                pulled += 1;
                pipeline.collect(entry)
            });
        }

        trace!(
            pulled,
            available = eager::size(input),
            reversed = self.reversed,
            "finished run"
        );
        pipeline.finish()
    }
}

enum Segment {
    Run(Run),
    Barrier(Barrier),
}

/// The steps of a sequence grouped into runs and barriers.
pub(crate) struct Plan {
    segments: Vec<Segment>,
}

impl Plan {
    pub(crate) fn compile(steps: &[&Step], settings: &Settings) -> Self {
        let eager = settings.evaluation == Evaluation::Eager;
        let mut segments = Vec::new();
        let mut run = Run::default();

        let flush = |run: &mut Run, segments: &mut Vec<Segment>| {
            if !run.is_empty() {
                segments.push(Segment::Run(std::mem::take(run)));
            }
        };

        for step in steps {
            match step {
                Step::Stage(stage) => {
                    if eager || stage.needs() == Needs::Collection {
                        flush(&mut run, &mut segments);
                    }
                    run.layers.push(Layer::Stage(stage.clone()));
                }
                Step::Reverse if !eager && run.can_flip() => {
                    run.reversed = !run.reversed;
                    run.layers.push(Layer::Unkey);
                }
                Step::Reverse => {
                    flush(&mut run, &mut segments);
                    segments.push(Segment::Barrier(Barrier::collection("reverse", |input, _| {
                        eager::reverse(input)
                    })));
                }
                Step::Barrier(barrier) => {
                    flush(&mut run, &mut segments);
                    segments.push(Segment::Barrier(barrier.clone()));
                }
                Step::Terminal(terminal) => {
                    if eager || terminal.needs() == Needs::Collection {
                        flush(&mut run, &mut segments);
                    }
                    run.terminal = Some(terminal.clone());
                    segments.push(Segment::Run(std::mem::take(&mut run)));
                }
            }
        }
        flush(&mut run, &mut segments);

        let plan = Self { segments };
        debug!(
            steps = steps.len(),
            runs = plan.runs(),
            barriers = plan.segments.len() - plan.runs(),
            "compiled sequence"
        );
        plan
    }

    fn runs(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Run(_)))
            .count()
    }

    /// Evaluates every segment in order. `None` is a missing terminal result.
    pub(crate) fn evaluate(&self, source: &Value, settings: &Settings) -> Option<Value> {
        let Some((last, init)) = self.segments.split_last() else {
            return Some(source.clone());
        };
        let input = self.prefix(init, source, settings);
        Self::segment(last, &input, settings)
    }

    /// Evaluates all but the last segment, then drives the last run into
    /// `collector`. A final barrier or terminal is evaluated first and its
    /// result walked into `collector`.
    pub(crate) fn evaluate_into<C: Collector>(
        &self,
        source: &Value,
        settings: &Settings,
        collector: C,
    ) -> C::Output {
        match self.segments.split_last() {
            Some((Segment::Run(run), init)) if run.terminal.is_none() => {
                let input = self.prefix(init, source, settings);
                run.drive(&input, Box::new(collector))
            }
            Some(_) => {
                let output = self.evaluate(source, settings).unwrap_or(Value::Null);
                Run::default().drive(&output, Box::new(collector))
            }
            None => Run::default().drive(source, Box::new(collector)),
        }
    }

    fn prefix<'a>(&self, segments: &[Segment], source: &'a Value, settings: &Settings) -> Cow<'a, Value> {
        segments.iter().fold(Cow::Borrowed(source), |input, segment| {
            Cow::Owned(Self::segment(segment, &input, settings).unwrap_or(Value::Null))
        })
    }

    fn segment(segment: &Segment, input: &Value, settings: &Settings) -> Option<Value> {
        match segment {
            Segment::Run(run) => run.evaluate(input),
            Segment::Barrier(barrier) => {
                trace!(barrier = barrier.name, "materializing");
                barrier.apply(input, settings)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        Callback,
        step::{push, in_order, Steps},
        test_utils::{Counter, is_even, range, square},
    };

    fn plan(steps: &[Step], settings: &Settings) -> Plan {
        let list = steps
            .iter()
            .fold(None, |list: Steps, step| push(&list, step.clone()));
        Plan::compile(&in_order(&list), settings)
    }

    fn shape(plan: &Plan) -> Vec<&'static str> {
        plan.segments
            .iter()
            .map(|segment| match segment {
                Segment::Run(run) if run.reversed => "reversed run",
                Segment::Run(_) => "run",
                Segment::Barrier(barrier) => barrier.name,
            })
            .collect()
    }

    #[test]
    fn fuses_adjacent_stages() {
        let steps = [
            Step::Stage(Stage::Drop(1)),
            Step::Stage(Stage::Map(Callback::new(square))),
            Step::Stage(Stage::Take(2)),
        ];
        let lazy = plan(&steps, &Settings::default());
        let eager = plan(&steps, &Settings::eager());

        assert_eq!(shape(&lazy), ["run"]);
        assert_eq!(shape(&eager), ["run", "run", "run"]);
        for plan in [lazy, eager] {
            assert_eq!(plan.evaluate(&json!([1, 2, 3, 4]), &Settings::default()), Some(json!([4, 9])));
        }
    }

    #[test]
    fn reverse_flips_or_materializes() {
        let map = Step::Stage(Stage::Map(Callback::new(square)));
        let indexed = Step::Stage(Stage::Map(Callback::with_index(|v, _| v.clone())));

        let flipped = plan(&[map.clone(), Step::Reverse], &Settings::default());
        assert_eq!(shape(&flipped), ["reversed run"]);
        assert_eq!(flipped.evaluate(&json!([1, 2, 3]), &Settings::default()), Some(json!([9, 4, 1])));

        let materialized = plan(&[indexed, Step::Reverse], &Settings::default());
        assert_eq!(shape(&materialized), ["run", "reverse"]);

        let twice = plan(&[Step::Reverse, map, Step::Reverse], &Settings::default());
        assert_eq!(shape(&twice), ["run"]);
        assert_eq!(twice.evaluate(&json!([1, 2]), &Settings::default()), Some(json!([1, 4])));
    }

    #[test]
    fn collection_callbacks_start_a_run() {
        let seen = Callback::with_context(|_, ctx| ctx.collection.clone());
        let steps = [
            Step::Stage(Stage::Drop(1)),
            Step::Stage(Stage::Map(Callback::new(square))),
            Step::Stage(Stage::Map(seen)),
            Step::Stage(Stage::Take(1)),
        ];
        let plan = plan(&steps, &Settings::default());

        assert_eq!(shape(&plan), ["run", "run"]);
        assert_eq!(plan.evaluate(&json!([1, 2, 3]), &Settings::default()), Some(json!([[4, 9]])));
    }

    #[test]
    fn find_after_map_stops_early() {
        let (maps, finds) = (Counter::default(), Counter::default());
        let steps = [
            Step::Stage(Stage::Map(maps.callback(square))),
            Step::Terminal(Terminal::Find(finds.predicate(is_even))),
        ];
        let plan = plan(&steps, &Settings::default());

        assert_eq!(plan.evaluate(&range(1, 201), &Settings::default()), Some(json!(4)));
        assert_eq!((maps.get(), finds.get()), (2, 2));
    }

    #[test]
    fn object_shapes() {
        let object = json!({ "a": 1, "b": 2 });
        let map_values = Step::Stage(Stage::MapValues(Callback::new(square)));
        let filter = Step::Stage(Stage::Filter { pred: Callback::predicate(is_even), keep: true });

        let keyed = plan(&[map_values.clone()], &Settings::default());
        assert_eq!(keyed.evaluate(&object, &Settings::default()), Some(json!({ "a": 1, "b": 4 })));

        let unkeyed = plan(&[map_values.clone(), filter], &Settings::default());
        assert_eq!(unkeyed.evaluate(&object, &Settings::default()), Some(json!([4])));

        let reversed = plan(&[map_values.clone(), Step::Reverse], &Settings::default());
        assert_eq!(reversed.evaluate(&object, &Settings::default()), Some(json!([4, 1])));

        let rekeyed = plan(&[Step::Reverse, map_values], &Settings::default());
        assert_eq!(rekeyed.evaluate(&object, &Settings::default()), Some(json!({ "0": 4, "1": 1 })));
    }

    #[test]
    fn closed_pipeline_pulls_nothing() {
        let counter = Counter::default();
        let steps = [
            Step::Stage(Stage::Map(counter.callback(square))),
            Step::Stage(Stage::Take(0)),
        ];
        let plan = plan(&steps, &Settings::default());

        assert_eq!(plan.evaluate(&range(0, 10), &Settings::default()), Some(json!([])));
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn no_steps_returns_the_source() {
        let plan = plan(&[], &Settings::default());
        assert_eq!(plan.evaluate(&json!(5), &Settings::default()), Some(json!(5)));

        let plan = self::plan(&[Step::Stage(Stage::Take(3))], &Settings::default());
        assert_eq!(plan.evaluate(&json!(5), &Settings::default()), Some(json!([])));
    }
}
