//! Helpers over [`Value`] shared by the shorthands, the eager utilities and
//! the lazy engine.

use std::{cmp::Ordering, fmt::Write};

use itertools::Itertools;
use serde_json::{Number, Value};

/// Returns whether a value counts as "true" when a predicate produces it.
///
/// `null`, `false`, `0` and `""` are falsey. Everything else, including
/// empty arrays and objects, is truthy.
///
/// ```
/// use lazyseq::value::is_truthy;
/// use serde_json::json;
///
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!("")));
/// assert!(is_truthy(&json!([])));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Structural equality where numbers compare by numeric value.
///
/// `1` and `1.0` are equal here, while [`Value`]'s own `PartialEq` keeps
/// integers and floats apart.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| same_value_zero(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| same_value_zero(x, y)))
        }
        _ => a == b,
    }
}

fn number_eq(x: &Number, y: &Number) -> bool {
    NumberId::of(x) == NumberId::of(y)
}

/// The identity of a number under [`same_value_zero`].
///
/// Integers that an `f64` holds exactly share the identity of that float, so
/// `1` and `1.0` are the same number. Larger integers stay exact and never
/// equal a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberId {
    Int(i128),
    Float(u64),
}

impl NumberId {
    fn of(n: &Number) -> Self {
        let int = n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from));
        match int {
            Some(i) if (i as f64) as i128 == i => Self::float(i as f64),
            Some(i) => Self::Int(i),
            None => Self::float(n.as_f64().unwrap_or(f64::NAN)),
        }
    }

    fn float(f: f64) -> Self {
        let f = if f == 0.0 {
            0.0
        } else if f.is_nan() {
            f64::NAN
        } else {
            f
        };
        Self::Float(f.to_bits())
    }
}

/// Partial deep comparison: does `object` contain everything in `source`?
///
/// Objects match when every property of `source` matches the same property
/// of `object`. Arrays match when every item of `source` matches some item
/// of `object`. An empty `source` object matches anything.
///
/// ```
/// use lazyseq::value::is_match;
/// use serde_json::json;
///
/// let object = json!({ "a": 1, "b": { "c": [1, 2, 3] } });
/// assert!(is_match(&object, &json!({ "b": { "c": [3, 1] } })));
/// assert!(!is_match(&object, &json!({ "a": 2 })));
/// ```
pub fn is_match(object: &Value, source: &Value) -> bool {
    match (object, source) {
        (_, Value::Object(source)) if source.is_empty() => true,
        (Value::Object(object), Value::Object(source)) => source
            .iter()
            .all(|(key, source)| object.get(key).is_some_and(|object| is_match(object, source))),
        (Value::Array(object), Value::Array(source)) => source
            .iter()
            .all(|source| object.iter().any(|object| is_match(object, source))),
        _ => same_value_zero(object, source),
    }
}

/// Reads a property, following a `a.b[0].c` path when `path` is not itself a
/// key of `value`.
///
/// Missing properties read as `null`. `length` is a property of arrays and
/// strings.
///
/// ```
/// use lazyseq::value::property;
/// use serde_json::json;
///
/// let value = json!({ "a": [{ "b": 2 }], "a.b": 1 });
/// assert_eq!(property(&value, "a.b"), json!(1));
/// assert_eq!(property(&value, "a[0].b"), json!(2));
/// assert_eq!(property(&json!("three"), "length"), json!(5));
/// ```
pub fn property(value: &Value, path: &str) -> Value {
    get_path(value, path, &parse_path(path))
}

pub(crate) fn get_path(value: &Value, raw: &str, segments: &[String]) -> Value {
    if let Some(found) = get_key(value, raw) {
        return found;
    }

    if segments.len() < 2 {
        return Value::Null;
    }

    let mut current = value.clone();
    for segment in segments {
        match get_key(&current, segment) {
            Some(next) => current = next,
            None => return Value::Null,
        }
    }
    current
}

fn get_key(value: &Value, key: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(key).cloned(),
        Value::Array(items) if key == "length" => Some(items.len().into()),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)).cloned(),
        Value::String(s) if key == "length" => Some(s.chars().count().into()),
        Value::String(s) => key
            .parse::<usize>()
            .ok()
            .and_then(|i| s.chars().nth(i))
            .map(|c| Value::String(c.into())),
        _ => None,
    }
}

/// Splits `a.b[0]["c"]` into `["a", "b", "0", "c"]`.
pub(crate) fn parse_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => segments.push(std::mem::take(&mut current)),
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let quote = chars.next_if(|&c| c == '"' || c == '\'');
                while let Some(c) = chars.next_if(|&c| c != ']' && Some(c) != quote) {
                    current.push(c);
                }
                if quote.is_some() {
                    chars.next();
                }
                chars.next();
                segments.push(std::mem::take(&mut current));
                // `a[0].b`: the dot right after a bracket is not another segment.
                chars.next_if_eq(&'.');
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() || segments.is_empty() {
        segments.push(current);
    }
    segments
}

/// Formats a value as a mapping key, the way `group_by`, `count_by` and
/// `key_by` name their groups.
///
/// ```
/// use lazyseq::value::to_key;
/// use serde_json::json;
///
/// assert_eq!(to_key(&json!(6.0)), "6");
/// assert_eq!(to_key(&json!(4.2)), "4.2");
/// assert_eq!(to_key(&json!([1, "a"])), "1,a");
/// ```
pub fn to_key(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_key(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                item => to_key(item),
            })
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn number_key(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_owned(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// A total order over values, used by `sort_by`.
///
/// Numbers sort numerically, strings and booleans by their natural order and
/// arrays lexicographically. Across types: numbers, strings, booleans,
/// arrays, objects, then `null` last.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or_default(), y.as_f64().unwrap_or_default());
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(x, y)| compare(x, y))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

/// A string that is equal for two values exactly when they are
/// [`same_value_zero`]. Backs the hashed membership cache.
pub(crate) fn canonical(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push('n'),
        Value::Bool(true) => out.push('t'),
        Value::Bool(false) => out.push('f'),
        Value::Number(n) => {
            let _ = match NumberId::of(n) {
                NumberId::Int(i) => write!(out, "#{i}"),
                NumberId::Float(bits) => write!(out, "#f{bits:x}"),
            };
        }
        Value::String(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Array(items) => {
            out.push('[');
            for item in items {
                write_canonical(item, out);
                out.push(',');
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (key, item) in map.iter().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
                let _ = write!(out, "{key:?}:");
                write_canonical(item, out);
                out.push(',');
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn truthiness() {
        for falsey in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsey), "{falsey} should be falsey");
        }
        for truthy in [json!(true), json!(-1), json!("0"), json!({}), json!([])] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(same_value_zero(&json!(1), &json!(1.0)));
        assert!(same_value_zero(&json!([1, { "a": 2.0 }]), &json!([1.0, { "a": 2 }])));
        assert!(!same_value_zero(&json!(1), &json!("1")));
        assert_ne!(json!(1), json!(1.0));
    }

    #[test]
    fn partial_match() {
        let objects = [json!({ "a": 0, "b": 1 }), json!({ "a": 1, "b": 1 })];
        assert!(!is_match(&objects[0], &json!({ "a": 1 })));
        assert!(is_match(&objects[1], &json!({ "a": 1 })));
        assert!(is_match(&json!(5), &json!({})));
        assert!(!is_match(&json!(5), &json!({ "a": 1 })));
        assert!(is_match(&json!({ "a": [1, 2] }), &json!({ "a": [] })));
    }

    #[test]
    fn paths() {
        assert_eq!(parse_path("a"), ["a"]);
        assert_eq!(parse_path("a.b.c"), ["a", "b", "c"]);
        assert_eq!(parse_path("a[0].b"), ["a", "0", "b"]);
        assert_eq!(parse_path(r#"a["x.y"]"#), ["a", "x.y"]);
        assert_eq!(parse_path(""), [""]);

        let value = json!({ "a": { "b": [10, 20] } });
        assert_eq!(property(&value, "a.b[1]"), json!(20));
        assert_eq!(property(&value, "a.c"), Value::Null);
        assert_eq!(property(&json!([1, 2, 3]), "length"), json!(3));
        assert_eq!(property(&json!(["x", "y"]), "1"), json!("y"));
    }

    #[test]
    fn keys() {
        assert_eq!(to_key(&json!(-0.0)), "0");
        assert_eq!(to_key(&json!(1e20)), "100000000000000000000");
        assert_eq!(to_key(&json!(true)), "true");
        assert_eq!(to_key(&json!([1, null, 3])), "1,,3");
        assert_eq!(to_key(&json!({ "a": 1 })), "[object Object]");
    }

    #[test]
    fn ordering() {
        let mut values = vec![json!(null), json!("b"), json!(2), json!("a"), json!(1.5), json!(true)];
        values.sort_by(compare);
        assert_eq!(values, [json!(1.5), json!(2), json!("a"), json!("b"), json!(true), json!(null)]);
    }

    #[test]
    fn canonical_agrees_with_equality() {
        let pairs = [
            (json!(1), json!(1.0)),
            (json!({ "a": 1, "b": [2] }), json!({ "b": [2.0], "a": 1 })),
            (json!("1"), json!(1)),
            (json!([1, 2]), json!([2, 1])),
            (json!(9_007_199_254_740_993_i64), json!(9_007_199_254_740_992.0)),
            (json!(9_007_199_254_740_992_i64), json!(9_007_199_254_740_992.0)),
            (json!(u64::MAX), json!(18_446_744_073_709_551_616.0)),
            (json!(-0.0), json!(0)),
        ];
        for (a, b) in pairs {
            assert_eq!(canonical(&a) == canonical(&b), same_value_zero(&a, &b), "{a} vs {b}");
        }
    }
}
