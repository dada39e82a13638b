use std::{fmt::Debug, rc::Rc};

use serde_json::Value;

use crate::value::{self, is_match, parse_path, same_value_zero};

/// What a callback is handed besides the element itself.
///
/// Only callbacks built with [`Callback::with_context`] see this.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Position of the element in the input of the step.
    pub index: usize,
    /// Property name of the element when the input is a mapping.
    pub key: Option<&'a str>,
    /// The whole input of the step.
    pub collection: &'a Value,
}

/// How much context a callback declared it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Needs {
    Value,
    Index,
    Collection,
}

#[derive(Clone)]
enum Func {
    Unary(Rc<dyn Fn(&Value) -> Value>),
    Indexed(Rc<dyn Fn(&Value, usize) -> Value>),
    Contextual(Rc<dyn Fn(&Value, &Context<'_>) -> Value>),
}

/// A step callback together with the context it needs.
///
/// The caller states the needs up front by choosing a constructor, so the
/// engine knows which steps it may fuse and which need the whole input
/// materialized.
///
/// # Examples
///
/// ```
/// use lazyseq::{Callback, wrap};
/// use serde_json::json;
///
/// let doubled = Callback::new(|v| json!(v.as_i64().unwrap_or(0) * 2));
/// let positioned = Callback::with_index(|v, i| json!([i, v]));
///
/// assert_eq!(wrap(json!([1, 2])).map(doubled).value(), json!([2, 4]));
/// assert_eq!(wrap(json!(["a"])).map(positioned).value(), json!([[0, "a"]]));
/// ```
#[derive(Clone)]
pub struct Callback {
    func: Func,
}

impl Callback {
    /// A callback that only looks at the element.
    pub fn new(f: impl Fn(&Value) -> Value + 'static) -> Self {
        Self {
            func: Func::Unary(Rc::new(f)),
        }
    }

    /// A callback that also receives the element's position.
    pub fn with_index(f: impl Fn(&Value, usize) -> Value + 'static) -> Self {
        Self {
            func: Func::Indexed(Rc::new(f)),
        }
    }

    /// A callback that receives the full [`Context`], including the whole
    /// input of its step.
    pub fn with_context(f: impl Fn(&Value, &Context<'_>) -> Value + 'static) -> Self {
        Self {
            func: Func::Contextual(Rc::new(f)),
        }
    }

    /// An element-only predicate.
    pub fn predicate(f: impl Fn(&Value) -> bool + 'static) -> Self {
        Self::new(move |v| Value::Bool(f(v)))
    }

    pub(crate) fn identity() -> Self {
        Self::new(Value::clone)
    }

    #[inline]
    pub(crate) fn needs(&self) -> Needs {
        match self.func {
            Func::Unary(_) => Needs::Value,
            Func::Indexed(_) => Needs::Index,
            Func::Contextual(_) => Needs::Collection,
        }
    }

    /// Invokes the callback, building only as much context as it declared.
    #[inline]
    pub(crate) fn call(
        &self,
        value: &Value,
        index: usize,
        key: Option<&str>,
        collection: &Value,
    ) -> Value {
        match &self.func {
            Func::Unary(f) => f(value),
            Func::Indexed(f) => f(value, index),
            Func::Contextual(f) => f(
                value,
                &Context {
                    index,
                    key,
                    collection,
                },
            ),
        }
    }
}

impl Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("needs", &self.needs())
            .finish()
    }
}

/// A callback argument in any of its accepted forms.
///
/// Every step that takes a callback accepts `impl Into<Iteratee>`:
///
/// - a [`Callback`];
/// - a property name or path (`"a"`, `"a.b[0]"`) or an index (`0usize`);
/// - a partial-match object (`json!({ "a": 1 })`);
/// - a `[path, value]` pair (`json!(["a", 1])`);
/// - `None` or `json!(null)` for the identity.
///
/// The shorthand is turned into a [`Callback`] once, when the step is added.
///
/// # Examples
///
/// ```
/// use lazyseq::eager;
/// use serde_json::json;
///
/// let objects = json!([{ "a": 0, "b": 1 }, { "a": 1, "b": 1 }]);
///
/// assert_eq!(eager::filter(&objects, "a"), [json!({ "a": 1, "b": 1 })]);
/// assert_eq!(eager::filter(&objects, json!({ "a": 0 })), [json!({ "a": 0, "b": 1 })]);
/// assert_eq!(eager::filter(&objects, json!(["b", 1])).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub enum Iteratee {
    Identity,
    Property(String),
    Matches(Value),
    MatchesProperty(String, Value),
    Function(Callback),
}

impl Iteratee {
    /// Resolves the shorthand into a callable.
    pub fn resolve(self) -> Callback {
        match self {
            Self::Identity => Callback::identity(),
            Self::Function(callback) => callback,
            Self::Property(path) => {
                let segments = parse_path(&path);
                Callback::new(move |v| value::get_path(v, &path, &segments))
            }
            Self::Matches(source) => Callback::predicate(move |v| is_match(v, &source)),
            Self::MatchesProperty(path, expected) => {
                let segments = parse_path(&path);
                Callback::predicate(move |v| {
                    let actual = value::get_path(v, &path, &segments);
                    match &expected {
                        Value::Object(_) | Value::Array(_) => is_match(&actual, &expected),
                        _ => same_value_zero(&actual, &expected),
                    }
                })
            }
        }
    }
}

impl From<Callback> for Iteratee {
    #[inline]
    fn from(callback: Callback) -> Self {
        Self::Function(callback)
    }
}

impl From<fn(&Value) -> Value> for Iteratee {
    #[inline]
    fn from(f: fn(&Value) -> Value) -> Self {
        Self::Function(Callback::new(f))
    }
}

impl From<&str> for Iteratee {
    #[inline]
    fn from(path: &str) -> Self {
        Self::Property(path.to_owned())
    }
}

impl From<String> for Iteratee {
    #[inline]
    fn from(path: String) -> Self {
        Self::Property(path)
    }
}

impl From<usize> for Iteratee {
    #[inline]
    fn from(index: usize) -> Self {
        Self::Property(index.to_string())
    }
}

impl From<Value> for Iteratee {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Identity,
            Value::Object(_) => Self::Matches(value),
            Value::Array(mut pair) => {
                let expected = if pair.len() > 1 {
                    pair.swap_remove(1)
                } else {
                    Value::Null
                };
                let path = pair.first().map(value::to_key).unwrap_or_default();
                Self::MatchesProperty(path, expected)
            }
            other => Self::Property(value::to_key(&other)),
        }
    }
}

impl<T: Into<Iteratee>> From<Option<T>> for Iteratee {
    #[inline]
    fn from(iteratee: Option<T>) -> Self {
        iteratee.map_or(Self::Identity, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn apply(iteratee: impl Into<Iteratee>, value: Value) -> Value {
        iteratee.into().resolve().call(&value, 0, None, &Value::Null)
    }

    #[test]
    fn shorthands_resolve() {
        let object = json!({ "a": 1, "b": { "c": 2 } });

        assert_eq!(apply("a", object.clone()), json!(1));
        assert_eq!(apply("b.c", object.clone()), json!(2));
        assert_eq!(apply(json!({ "a": 1 }), object.clone()), json!(true));
        assert_eq!(apply(json!(["a", 2]), object.clone()), json!(false));
        assert_eq!(apply(json!(["b", { "c": 2 }]), object.clone()), json!(true));
        assert_eq!(apply(1usize, json!([1, "a"])), json!("a"));
        assert_eq!(apply(json!(0), json!([1, "a"])), json!(1));
    }

    #[test]
    fn nullish_is_identity() {
        assert_eq!(apply(json!(null), json!([3])), json!([3]));
        assert_eq!(apply(None::<&str>, json!(4)), json!(4));
    }

    #[test]
    fn needs_follow_constructor() {
        assert_eq!(Callback::new(Value::clone).needs(), Needs::Value);
        assert_eq!(Callback::with_index(|v, _| v.clone()).needs(), Needs::Index);
        assert_eq!(
            Callback::with_context(|_, ctx| ctx.collection.clone()).needs(),
            Needs::Collection
        );
        assert_eq!(Iteratee::from("a").resolve().needs(), Needs::Value);
    }

    #[test]
    fn context_is_passed_through() {
        let callback = Callback::with_context(|v, ctx| json!([v, ctx.index, ctx.key, ctx.collection]));
        let collection = json!({ "k": 7 });
        assert_eq!(
            callback.call(&json!(7), 3, Some("k"), &collection),
            json!([7, 3, "k", { "k": 7 }])
        );
    }
}
