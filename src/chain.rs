use std::{convert::identity, fmt::Debug, marker::PhantomData, rc::Rc};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Collector, Iteratee, Settings,
    eager::{self, SetOps},
    error::{Error, Result},
    imp::Reducer,
    iteratee::Needs,
    plan::Plan,
    source::elements,
    step::{Barrier, Stage, Step, Steps, Terminal, in_order, push},
    value::is_truthy,
};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Implicit {}
    impl Sealed for super::Explicit {}
}

/// Decides what the terminal methods of a [`Wrapper`] return.
///
/// This trait is sealed: [`Implicit`] and [`Explicit`] are its only
/// implementations.
pub trait ChainMode: sealed::Sealed + Sized {
    /// The return type of a terminal method producing a `T`.
    type Terminal<T>;

    #[doc(hidden)]
    fn terminal<T>(wrapper: Wrapper<Self>, convert: fn(Option<Value>) -> T) -> Self::Terminal<T>;
}

/// The mode of a sequence created by [`wrap`]: terminal methods such as
/// [`find`](Wrapper::find) or [`size`](Wrapper::size) evaluate right away and
/// return a plain value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Implicit;

/// The mode entered with [`Wrapper::chain`]: every method, terminal or not,
/// returns another wrapper. Call [`value`](Wrapper::value) to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Explicit;

impl ChainMode for Implicit {
    type Terminal<T> = T;

    #[inline]
    fn terminal<T>(wrapper: Wrapper<Self>, convert: fn(Option<Value>) -> T) -> T {
        convert(wrapper.evaluate())
    }
}

impl ChainMode for Explicit {
    type Terminal<T> = Wrapper<Explicit>;

    #[inline]
    fn terminal<T>(wrapper: Wrapper<Self>, _: fn(Option<Value>) -> T) -> Wrapper<Explicit> {
        wrapper
    }
}

/// A source value together with the steps pending on it.
///
/// Methods append a step and return a new wrapper; nothing runs until
/// [`value`](Wrapper::value), iteration, or (in [`Implicit`] mode) a terminal
/// method. Evaluation fuses consecutive steps into one pass over the source
/// and stops pulling elements as soon as the result is known.
///
/// Wrappers are cheap to clone and never change: appending to the same
/// wrapper twice gives two independent sequences.
///
/// # Examples
///
/// ```
/// use lazyseq::{Callback, wrap};
/// use serde_json::json;
///
/// let square = Callback::new(|v| json!(v.as_i64().unwrap_or(0).pow(2)));
/// let even = Callback::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
///
/// let numbers = wrap(json!([1, 2, 3, 4, 5, 6]));
///
/// assert_eq!(numbers.map(square.clone()).filter(even.clone()).take(2).value(), json!([4, 16]));
/// assert_eq!(numbers.map(square).find(even), Some(json!(4)));
/// ```
pub struct Wrapper<M: ChainMode = Implicit> {
    source: Rc<Value>,
    steps: Steps,
    settings: Rc<Settings>,
    mode: PhantomData<M>,
}

/// Wraps `source` for chaining with default [`Settings`].
pub fn wrap(source: impl Into<Value>) -> Wrapper {
    wrap_with(source, Settings::default())
}

/// Wraps `source` for chaining with the given settings.
pub fn wrap_with(source: impl Into<Value>, settings: Settings) -> Wrapper {
    Wrapper {
        source: Rc::new(source.into()),
        steps: None,
        settings: Rc::new(settings),
        mode: PhantomData,
    }
}

/// Wraps any serializable value.
///
/// # Errors
///
/// Fails if `source` cannot be represented as a [`Value`], such as a map
/// with non-string keys.
pub fn wrap_serialize<T: Serialize + ?Sized>(source: &T) -> Result<Wrapper> {
    serde_json::to_value(source).map(wrap).map_err(Error::Wrap)
}

impl<M: ChainMode> Wrapper<M> {
    fn with(&self, step: Step) -> Self {
        Self {
            source: Rc::clone(&self.source),
            steps: push(&self.steps, step),
            settings: Rc::clone(&self.settings),
            mode: PhantomData,
        }
    }

    fn stage(&self, stage: Stage) -> Self {
        self.with(Step::Stage(stage))
    }

    /// `stage` applied from the other end: reverse, apply, reverse back.
    fn from_end(&self, stage: Stage) -> Self {
        self.with(Step::Reverse)
            .stage(stage)
            .with(Step::Reverse)
    }

    fn barrier(&self, barrier: Barrier) -> Self {
        self.with(Step::Barrier(barrier))
    }

    fn collection<T: Into<Value>>(
        &self,
        name: &'static str,
        apply: impl Fn(&Value, &Settings) -> T + 'static,
    ) -> Self {
        self.barrier(Barrier::collection(name, apply))
    }

    fn finish<T>(self, convert: fn(Option<Value>) -> T) -> M::Terminal<T> {
        M::terminal(self, convert)
    }

    pub(crate) fn evaluate(&self) -> Option<Value> {
        Plan::compile(&in_order(&self.steps), &self.settings).evaluate(&self.source, &self.settings)
    }

    /// The settings this sequence evaluates with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switches to [`Explicit`] mode, where terminal methods keep returning
    /// wrappers.
    pub fn chain(&self) -> Wrapper<Explicit> {
        Wrapper {
            source: Rc::clone(&self.source),
            steps: self.steps.clone(),
            settings: Rc::clone(&self.settings),
            mode: PhantomData,
        }
    }

    /// Evaluates the sequence.
    ///
    /// Without pending steps this is the source itself. A terminal step that
    /// found nothing evaluates to `null`.
    pub fn value(&self) -> Value {
        self.evaluate().unwrap_or(Value::Null)
    }

    /// Evaluates the sequence into a typed value.
    ///
    /// # Errors
    ///
    /// Fails if the result does not deserialize as `T`.
    ///
    /// ```
    /// use lazyseq::wrap;
    /// use serde_json::json;
    ///
    /// let firsts: Vec<u32> = wrap(json!([3, 1, 2])).take(2).value_as().unwrap();
    /// assert_eq!(firsts, [3, 1]);
    ///
    /// assert!(wrap(json!(["a"])).value_as::<Vec<u32>>().is_err());
    /// ```
    pub fn value_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value()).map_err(Error::Convert)
    }

    /// The same steps over a different source.
    pub fn plant(&self, source: impl Into<Value>) -> Self {
        Self {
            source: Rc::new(source.into()),
            steps: self.steps.clone(),
            settings: Rc::clone(&self.settings),
            mode: PhantomData,
        }
    }

    /// Evaluates now and wraps the result, so later steps start from it.
    pub fn commit(&self) -> Self {
        Self {
            source: Rc::new(self.value()),
            steps: None,
            settings: Rc::clone(&self.settings),
            mode: PhantomData,
        }
    }

    /// Evaluates the sequence into `collector`.
    ///
    /// Pending steps after the last barrier are fused in front of
    /// `collector`, so it closing early stops the walk over the source.
    pub fn collect_into<C: Collector>(&self, collector: C) -> C::Output {
        Plan::compile(&in_order(&self.steps), &self.settings).evaluate_into(
            &self.source,
            &self.settings,
            collector,
        )
    }

    /// Passes the intermediate value to `f` and continues with its result.
    pub fn thru(&self, f: impl Fn(Value) -> Value + 'static) -> Self {
        self.barrier(Barrier::new("thru", move |input, _| Some(f(input.clone()))))
    }

    /// Replaces every element with the result of `iteratee`.
    pub fn map(&self, iteratee: impl Into<Iteratee>) -> Self {
        self.stage(Stage::Map(iteratee.into().resolve()))
    }

    /// Keeps the elements `predicate` holds for.
    pub fn filter(&self, predicate: impl Into<Iteratee>) -> Self {
        self.stage(Stage::Filter {
            pred: predicate.into().resolve(),
            keep: true,
        })
    }

    /// Drops the elements `predicate` holds for.
    pub fn reject(&self, predicate: impl Into<Iteratee>) -> Self {
        self.stage(Stage::Filter {
            pred: predicate.into().resolve(),
            keep: false,
        })
    }

    /// Removes falsey elements.
    pub fn compact(&self) -> Self {
        self.filter(Iteratee::Identity)
    }

    /// Maps every value, keeping its key. The result is a mapping.
    pub fn map_values(&self, iteratee: impl Into<Iteratee>) -> Self {
        self.stage(Stage::MapValues(iteratee.into().resolve()))
    }

    /// Keeps the entries `predicate` holds for. The result is a mapping.
    pub fn pick_by(&self, predicate: impl Into<Iteratee>) -> Self {
        self.stage(Stage::PickBy {
            pred: predicate.into().resolve(),
            keep: true,
        })
    }

    /// Drops the entries `predicate` holds for. The result is a mapping.
    pub fn omit_by(&self, predicate: impl Into<Iteratee>) -> Self {
        self.stage(Stage::PickBy {
            pred: predicate.into().resolve(),
            keep: false,
        })
    }

    /// The first `n` elements.
    pub fn take(&self, n: usize) -> Self {
        self.stage(Stage::Take(n))
    }

    /// Every element after the first `n`.
    pub fn drop(&self, n: usize) -> Self {
        self.stage(Stage::Drop(n))
    }

    /// The last `n` elements.
    pub fn take_right(&self, n: usize) -> Self {
        self.from_end(Stage::Take(n))
    }

    /// Every element before the last `n`.
    pub fn drop_right(&self, n: usize) -> Self {
        self.from_end(Stage::Drop(n))
    }

    /// Every element but the first.
    pub fn tail(&self) -> Self {
        self.drop(1)
    }

    /// Every element but the last.
    pub fn initial(&self) -> Self {
        self.drop_right(1)
    }

    /// The leading elements `predicate` holds for.
    pub fn take_while(&self, predicate: impl Into<Iteratee>) -> Self {
        self.stage(Stage::TakeWhile(predicate.into().resolve()))
    }

    /// Everything after the leading elements `predicate` holds for.
    pub fn drop_while(&self, predicate: impl Into<Iteratee>) -> Self {
        self.stage(Stage::DropWhile(predicate.into().resolve()))
    }

    /// The trailing elements `predicate` holds for.
    ///
    /// A predicate that asks for positions sees each element's position from
    /// the front, so it is evaluated on the materialized input.
    pub fn take_right_while(&self, predicate: impl Into<Iteratee>) -> Self {
        let pred = predicate.into().resolve();
        if pred.needs() == Needs::Value {
            self.from_end(Stage::TakeWhile(pred))
        } else {
            self.collection("take_right_while", move |input, _| {
                eager::take_right_while(input, pred.clone())
            })
        }
    }

    /// Everything before the trailing elements `predicate` holds for.
    pub fn drop_right_while(&self, predicate: impl Into<Iteratee>) -> Self {
        let pred = predicate.into().resolve();
        if pred.needs() == Needs::Value {
            self.from_end(Stage::DropWhile(pred))
        } else {
            self.collection("drop_right_while", move |input, _| {
                eager::drop_right_while(input, pred.clone())
            })
        }
    }

    /// The elements from `start` up to, not including, `end`. Negative
    /// bounds count back from the end.
    ///
    /// Bounds of the same sign fuse like `drop`/`take` and their right-hand
    /// forms. A negative `start` with a non-negative `end` depends on the
    /// length and is computed on the materialized input.
    pub fn slice(&self, start: isize, end: Option<isize>) -> Self {
        match (start, end) {
            (0.., _) => {
                let start = start.unsigned_abs();
                let dropped = if start > 0 {
                    self.drop(start)
                } else {
                    self.clone()
                };
                match end {
                    None => dropped,
                    Some(end @ 0..) => dropped.take(end.unsigned_abs().saturating_sub(start)),
                    Some(end) => dropped.drop_right(end.unsigned_abs()),
                }
            }
            (_, None) => self.take_right(start.unsigned_abs()),
            (_, Some(end)) if end < 0 => self
                .take_right(start.unsigned_abs())
                .drop_right(end.unsigned_abs()),
            _ => self.collection("slice", move |input, _| eager::slice(input, start, end)),
        }
    }

    /// The elements in reverse order. Reversing after fusable steps flips
    /// the walk instead of materializing where it can.
    pub fn reverse(&self) -> Self {
        self.with(Step::Reverse)
    }

    /// Groups the elements into arrays under the key `iteratee` gives them.
    pub fn group_by(&self, iteratee: impl Into<Iteratee>) -> Self {
        let f = iteratee.into().resolve();
        self.collection("group_by", move |input, _| eager::group_by(input, f.clone()))
    }

    /// Counts the elements under each key `iteratee` gives them.
    pub fn count_by(&self, iteratee: impl Into<Iteratee>) -> Self {
        let f = iteratee.into().resolve();
        self.collection("count_by", move |input, _| eager::count_by(input, f.clone()))
    }

    /// Maps each key `iteratee` gives to the last element that produced it.
    pub fn key_by(&self, iteratee: impl Into<Iteratee>) -> Self {
        let f = iteratee.into().resolve();
        self.collection("key_by", move |input, _| eager::key_by(input, f.clone()))
    }

    /// Sorts stably by the result of `iteratee`.
    pub fn sort_by(&self, iteratee: impl Into<Iteratee>) -> Self {
        let f = iteratee.into().resolve();
        self.collection("sort_by", move |input, _| eager::sort_by(input, f.clone()))
    }

    pub fn uniq(&self) -> Self {
        self.uniq_by(Iteratee::Identity)
    }

    pub fn uniq_by(&self, iteratee: impl Into<Iteratee>) -> Self {
        let f = iteratee.into().resolve();
        self.collection("uniq_by", move |input, settings| {
            SetOps::new(settings).uniq_by(elements(input), f.clone().into())
        })
    }

    /// Like [`uniq`](Self::uniq), treating two elements as the same when
    /// `comparator` says so. Always scans, whatever the settings.
    pub fn uniq_with(&self, comparator: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.collection("uniq_with", move |input, _| eager::uniq_with(input, &comparator))
    }

    pub fn flatten(&self) -> Self {
        self.collection("flatten", |input, _| eager::flatten(input))
    }

    /// Appends `values`, splicing array values in one level deep.
    pub fn concat<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self {
        let values = to_values(values);
        self.collection("concat", move |input, _| eager::concat(input, &values))
    }

    /// Removes the elements found in any of the `others` arrays.
    pub fn difference<V: Into<Value>>(&self, others: impl IntoIterator<Item = V>) -> Self {
        self.difference_by(others, Iteratee::Identity)
    }

    pub fn difference_by<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        iteratee: impl Into<Iteratee>,
    ) -> Self {
        let others = to_values(others);
        let f = iteratee.into().resolve();
        self.collection("difference", move |input, settings| {
            SetOps::new(settings).difference_by(input, &others, f.clone().into())
        })
    }

    /// Keeps the unique elements also found in every one of `others`.
    pub fn intersection<V: Into<Value>>(&self, others: impl IntoIterator<Item = V>) -> Self {
        self.intersection_by(others, Iteratee::Identity)
    }

    pub fn intersection_by<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        iteratee: impl Into<Iteratee>,
    ) -> Self {
        let others = to_values(others);
        let f = iteratee.into().resolve();
        self.collection("intersection", move |input, settings| {
            SetOps::new(settings).intersection_by(&with_input(input, &others), f.clone().into())
        })
    }

    /// The unique elements of this sequence followed by those of `others`.
    pub fn union<V: Into<Value>>(&self, others: impl IntoIterator<Item = V>) -> Self {
        self.union_by(others, Iteratee::Identity)
    }

    pub fn union_by<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        iteratee: impl Into<Iteratee>,
    ) -> Self {
        let others = to_values(others);
        let f = iteratee.into().resolve();
        self.collection("union", move |input, settings| {
            SetOps::new(settings).union_by(&with_input(input, &others), f.clone().into())
        })
    }

    /// The symmetric difference of this sequence and `others`.
    pub fn xor<V: Into<Value>>(&self, others: impl IntoIterator<Item = V>) -> Self {
        self.xor_by(others, Iteratee::Identity)
    }

    pub fn xor_by<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        iteratee: impl Into<Iteratee>,
    ) -> Self {
        let others = to_values(others);
        let f = iteratee.into().resolve();
        self.collection("xor", move |input, settings| {
            SetOps::new(settings).xor_by(&with_input(input, &others), f.clone().into())
        })
    }

    pub fn difference_with<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        comparator: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Self {
        let others = to_values(others);
        self.collection("difference_with", move |input, _| {
            eager::difference_with(input, &others, &comparator)
        })
    }

    pub fn intersection_with<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        comparator: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Self {
        let others = to_values(others);
        self.collection("intersection_with", move |input, _| {
            eager::intersection_with(&with_input(input, &others), &comparator)
        })
    }

    pub fn union_with<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        comparator: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Self {
        let others = to_values(others);
        self.collection("union_with", move |input, _| {
            eager::union_with(&with_input(input, &others), &comparator)
        })
    }

    pub fn xor_with<V: Into<Value>>(
        &self,
        others: impl IntoIterator<Item = V>,
        comparator: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Self {
        let others = to_values(others);
        self.collection("xor_with", move |input, _| {
            eager::xor_with(&with_input(input, &others), &comparator)
        })
    }

    /// Removes every element equal to one of `values`.
    pub fn without<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self {
        let excluded = [Value::Array(to_values(values))];
        self.collection("without", move |input, settings| {
            SetOps::new(settings).difference_by(input, &excluded, Iteratee::Identity)
        })
    }

    /// Removes every element `comparator` matches against one of `values`.
    pub fn pull_all_with<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
        comparator: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Self {
        let values = to_values(values);
        self.collection("pull_all_with", move |input, _| {
            eager::pull_all_with(input, &values, &comparator)
        })
    }

    pub fn chunk(&self, size: usize) -> Self {
        self.collection("chunk", move |input, _| eager::chunk(input, size))
    }

    /// Pairs up elements by position with those of the `others` arrays.
    pub fn zip<V: Into<Value>>(&self, others: impl IntoIterator<Item = V>) -> Self {
        let others = to_values(others);
        self.collection("zip", move |input, _| eager::zip(&with_input(input, &others)))
    }

    pub fn to_pairs(&self) -> Self {
        self.collection("to_pairs", |input, _| eager::to_pairs(input))
    }

    pub fn keys(&self) -> Self {
        self.collection("keys", |input, _| eager::keys(input))
    }

    pub fn values(&self) -> Self {
        self.collection("values", |input, _| eager::values(input))
    }

    /// The first element satisfying `predicate`.
    pub fn find(&self, predicate: impl Into<Iteratee>) -> M::Terminal<Option<Value>> {
        let pred = predicate.into().resolve();
        self.with(Step::Terminal(Terminal::Find(pred)))
            .finish(identity)
    }

    /// The last element satisfying `predicate`.
    ///
    /// A value-only predicate walks the source backwards and stops at the
    /// first match. One that asks for positions sees each element's position
    /// from the front.
    pub fn find_last(&self, predicate: impl Into<Iteratee>) -> M::Terminal<Option<Value>> {
        let pred = predicate.into().resolve();
        let next = if pred.needs() == Needs::Value {
            self.with(Step::Reverse)
                .with(Step::Terminal(Terminal::Find(pred)))
        } else {
            self.barrier(Barrier::new("find_last", move |input, _| {
                eager::find_last(input, pred.clone())
            }))
        };
        next.finish(identity)
    }

    pub fn head(&self) -> M::Terminal<Option<Value>> {
        self.with(Step::Terminal(Terminal::Head)).finish(identity)
    }

    /// Alias of [`head`](Wrapper::head).
    pub fn first(&self) -> M::Terminal<Option<Value>> {
        self.head()
    }

    pub fn last(&self) -> M::Terminal<Option<Value>> {
        self.with(Step::Reverse)
            .with(Step::Terminal(Terminal::Head))
            .finish(identity)
    }

    /// The number of elements.
    pub fn size(&self) -> M::Terminal<usize> {
        self.with(Step::Terminal(Terminal::Size))
            .finish(|out| out.as_ref().and_then(Value::as_u64).map_or(0, |n| n as usize))
    }

    pub fn some(&self, predicate: impl Into<Iteratee>) -> M::Terminal<bool> {
        let pred = predicate.into().resolve();
        self.with(Step::Terminal(Terminal::Some(pred)))
            .finish(|out| out.as_ref().is_some_and(is_truthy))
    }

    pub fn every(&self, predicate: impl Into<Iteratee>) -> M::Terminal<bool> {
        let pred = predicate.into().resolve();
        self.with(Step::Terminal(Terminal::Every(pred)))
            .finish(|out| out.as_ref().is_some_and(is_truthy))
    }

    /// Folds the elements into `init`.
    pub fn fold(
        &self,
        init: Value,
        f: impl Fn(Value, &Value) -> Value + 'static,
    ) -> M::Terminal<Value> {
        self.fold_with(Some(init), Rc::new(f))
            .finish(|out| out.unwrap_or(Value::Null))
    }

    /// Folds the elements, seeding the accumulator with the first one.
    /// An empty sequence reduces to `None`.
    pub fn reduce(&self, f: impl Fn(Value, &Value) -> Value + 'static) -> M::Terminal<Option<Value>> {
        self.fold_with(None, Rc::new(f)).finish(identity)
    }

    fn fold_with(&self, accum: Option<Value>, f: Reducer) -> Self {
        self.with(Step::Terminal(Terminal::Fold { accum, f }))
    }
}

fn to_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Vec<Value> {
    values.into_iter().map(Into::into).collect()
}

fn with_input(input: &Value, others: &[Value]) -> Vec<Value> {
    let mut arrays = Vec::with_capacity(others.len() + 1);
    arrays.push(input.clone());
    arrays.extend_from_slice(others);
    arrays
}

impl<M: ChainMode> Clone for Wrapper<M> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            steps: self.steps.clone(),
            settings: Rc::clone(&self.settings),
            mode: PhantomData,
        }
    }
}

impl<M: ChainMode> Debug for Wrapper<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapper")
            .field("source", &self.source)
            .field("steps", &in_order(&self.steps))
            .field("settings", &self.settings)
            .field("mode", &std::any::type_name::<M>())
            .finish()
    }
}

impl<M: ChainMode> IntoIterator for Wrapper<M> {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        (&self).into_iter()
    }
}

impl<M: ChainMode> IntoIterator for &Wrapper<M> {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    /// Evaluates the sequence and iterates over the result's elements.
    fn into_iter(self) -> Self::IntoIter {
        elements(&self.value()).into_iter()
    }
}


#[cfg(test)]
mod proptests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::Callback;

    #[derive(Debug, Clone)]
    enum Op {
        Inc,
        AddIndex,
        KeepEven,
        DropEven,
        Take(usize),
        Drop(usize),
        TakeRight(usize),
        DropRight(usize),
        TakeWhileBelow(i64),
        DropWhileBelow(i64),
        TakeRightWhileAbove(i64),
        DropRightWhileAbove(i64),
        Reverse,
        Slice(isize, Option<isize>),
        Uniq,
        Compact,
        SortDesc,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Inc),
            Just(Op::AddIndex),
            Just(Op::KeepEven),
            Just(Op::DropEven),
            (0..8_usize).prop_map(Op::Take),
            (0..8_usize).prop_map(Op::Drop),
            (0..8_usize).prop_map(Op::TakeRight),
            (0..8_usize).prop_map(Op::DropRight),
            (-5..5_i64).prop_map(Op::TakeWhileBelow),
            (-5..5_i64).prop_map(Op::DropWhileBelow),
            (-5..5_i64).prop_map(Op::TakeRightWhileAbove),
            (-5..5_i64).prop_map(Op::DropRightWhileAbove),
            Just(Op::Reverse),
            (-8..8_isize, proptest::option::of(-8..8_isize)).prop_map(|(s, e)| Op::Slice(s, e)),
            Just(Op::Uniq),
            Just(Op::Compact),
            Just(Op::SortDesc),
        ]
    }

    fn int(value: &Value) -> i64 {
        value.as_i64().unwrap_or_default()
    }

    fn inc() -> Callback {
        Callback::new(|v| json!(int(v) + 1))
    }

    fn add_index() -> Callback {
        Callback::with_index(|v, i| json!(int(v) + i as i64))
    }

    fn even() -> Callback {
        Callback::predicate(|v| int(v) % 2 == 0)
    }

    fn below(n: i64) -> Callback {
        Callback::predicate(move |v| int(v) < n)
    }

    fn above(n: i64) -> Callback {
        Callback::predicate(move |v| int(v) > n)
    }

    fn negate() -> Callback {
        Callback::new(|v| json!(-int(v)))
    }

    fn chained<M: ChainMode>(wrapper: Wrapper<M>, op: &Op) -> Wrapper<M> {
        match *op {
            Op::Inc => wrapper.map(inc()),
            Op::AddIndex => wrapper.map(add_index()),
            Op::KeepEven => wrapper.filter(even()),
            Op::DropEven => wrapper.reject(even()),
            Op::Take(n) => wrapper.take(n),
            Op::Drop(n) => wrapper.drop(n),
            Op::TakeRight(n) => wrapper.take_right(n),
            Op::DropRight(n) => wrapper.drop_right(n),
            Op::TakeWhileBelow(n) => wrapper.take_while(below(n)),
            Op::DropWhileBelow(n) => wrapper.drop_while(below(n)),
            Op::TakeRightWhileAbove(n) => wrapper.take_right_while(above(n)),
            Op::DropRightWhileAbove(n) => wrapper.drop_right_while(above(n)),
            Op::Reverse => wrapper.reverse(),
            Op::Slice(start, end) => wrapper.slice(start, end),
            Op::Uniq => wrapper.uniq(),
            Op::Compact => wrapper.compact(),
            Op::SortDesc => wrapper.sort_by(negate()),
        }
    }

    fn composed(value: &Value, op: &Op) -> Value {
        let out = match *op {
            Op::Inc => eager::map(value, inc()),
            Op::AddIndex => eager::map(value, add_index()),
            Op::KeepEven => eager::filter(value, even()),
            Op::DropEven => eager::reject(value, even()),
            Op::Take(n) => eager::take(value, n),
            Op::Drop(n) => eager::drop(value, n),
            Op::TakeRight(n) => eager::take_right(value, n),
            Op::DropRight(n) => eager::drop_right(value, n),
            Op::TakeWhileBelow(n) => eager::take_while(value, below(n)),
            Op::DropWhileBelow(n) => eager::drop_while(value, below(n)),
            Op::TakeRightWhileAbove(n) => eager::take_right_while(value, above(n)),
            Op::DropRightWhileAbove(n) => eager::drop_right_while(value, above(n)),
            Op::Reverse => eager::reverse(value),
            Op::Slice(start, end) => eager::slice(value, start, end),
            Op::Uniq => eager::uniq(value),
            Op::Compact => eager::compact(value),
            Op::SortDesc => eager::sort_by(value, negate()),
        };
        Value::from(out)
    }

    proptest! {
        #[test]
        fn lazy_equals_eager_equals_composition(
            source in propvec(-6..6_i64, ..24),
            ops in propvec(op(), ..7),
        ) {
            let source = json!(source);
            let lazy = ops.iter().fold(wrap(source.clone()), chained);
            let eager = ops.iter().fold(wrap_with(source.clone(), Settings::eager()), chained);
            let expected = ops.iter().fold(source, |value, op| composed(&value, op));

            prop_assert_eq!(lazy.value(), expected.clone());
            prop_assert_eq!(eager.value(), expected.clone());

            prop_assert_eq!(lazy.head(), eager::head(&expected));
            prop_assert_eq!(lazy.last(), eager::last(&expected));
            prop_assert_eq!(lazy.size(), eager::size(&expected));
            prop_assert_eq!(lazy.find(even()), eager::find(&expected, even()));
            prop_assert_eq!(lazy.find_last(even()), eager::find_last(&expected, even()));
            prop_assert_eq!(lazy.some(even()), eager::some(&expected, even()));
            prop_assert_eq!(lazy.every(even()), eager::every(&expected, even()));
        }

        #[test]
        fn branches_are_independent(
            source in propvec(-6..6_i64, ..16),
            left in propvec(op(), ..4),
            right in propvec(op(), ..4),
        ) {
            let base = wrap(json!(source)).map(inc());
            let expected_base = base.value();

            let left_value = left.iter().fold(base.clone(), chained).value();
            let right_value = right.iter().fold(base.clone(), chained).value();

            prop_assert_eq!(base.value(), expected_base.clone());
            prop_assert_eq!(left_value, left.iter().fold(expected_base.clone(), |v, op| composed(&v, op)));
            prop_assert_eq!(right_value, right.iter().fold(expected_base, |v, op| composed(&v, op)));
        }
    }
}
