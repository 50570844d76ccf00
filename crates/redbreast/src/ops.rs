//! Built-in operators.
//!
//! Comparators take `(actual, expected)` and answer whether a predicate
//! holds. Transforms take a single value and derive a new one that path
//! resolution continues from (`name__len__gt`). A kind mismatch never
//! errors: comparators return `false` and transforms return `None`.

use std::cmp::Ordering;

use regex::Regex;

use crate::value::{Number, Value};

/// Comparators every registry starts with.
pub(crate) const COMPARATORS: &[(&str, fn(&Value, &Value) -> bool)] = &[
    ("exact", exact),
    ("iexact", iexact),
    ("ne", ne),
    ("gt", gt),
    ("gte", gte),
    ("lt", lt),
    ("lte", lte),
    ("contains", contains),
    ("icontains", icontains),
    ("in", is_in),
    ("startswith", startswith),
    ("endswith", endswith),
    (PATTERN_OPERATOR, regex_match),
    ("len", len_eq),
];

/// The comparator whose expected value is a regular expression.
pub(crate) const PATTERN_OPERATOR: &str = "regex";

/// Transforms every registry starts with.
pub(crate) const TRANSFORMS: &[(&str, fn(&Value) -> Option<Value>)] = &[
    ("len", len),
    ("bool", truthy),
    ("max", max),
    ("min", min),
    ("all", all),
    ("any", any),
    ("abs", abs),
    ("sum", sum),
];

// ============================================================================
// Comparators
// ============================================================================

pub(crate) fn exact(actual: &Value, expected: &Value) -> bool {
    actual == expected
}

fn iexact(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(e)) => a.to_lowercase() == e.to_lowercase(),
        _ => actual == expected,
    }
}

fn ne(actual: &Value, expected: &Value) -> bool {
    actual != expected
}

fn ordering_holds(actual: &Value, expected: &Value, test: fn(Ordering) -> bool) -> bool {
    actual.compare(expected).is_some_and(test)
}

fn gt(actual: &Value, expected: &Value) -> bool {
    ordering_holds(actual, expected, Ordering::is_gt)
}

fn gte(actual: &Value, expected: &Value) -> bool {
    ordering_holds(actual, expected, Ordering::is_ge)
}

fn lt(actual: &Value, expected: &Value) -> bool {
    ordering_holds(actual, expected, Ordering::is_lt)
}

fn lte(actual: &Value, expected: &Value) -> bool {
    ordering_holds(actual, expected, Ordering::is_le)
}

/// Substring for strings, element for lists, key for records.
fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
        (Value::List(items), _) => items.contains(expected),
        (Value::Record(record), Value::String(key)) => record.get(key).is_some(),
        _ => false,
    }
}

fn icontains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(haystack), Value::String(needle)) => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        _ => contains(actual, expected),
    }
}

fn is_in(actual: &Value, expected: &Value) -> bool {
    contains(expected, actual)
}

fn startswith(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(s), Value::String(prefix)) => s.starts_with(prefix.as_str()),
        _ => false,
    }
}

fn endswith(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(s), Value::String(suffix)) => s.ends_with(suffix.as_str()),
        _ => false,
    }
}

/// Registered role of `regex`. Compiled lookups validate the pattern up
/// front and match through [`Predicate`](crate::Predicate), so this only
/// sees non-string patterns there.
fn regex_match(actual: &Value, expected: &Value) -> bool {
    let (Value::String(s), Value::String(pattern)) = (actual, expected) else {
        return false;
    };
    Regex::new(pattern).is_ok_and(|re| re.is_match(s))
}

fn len_eq(actual: &Value, expected: &Value) -> bool {
    actual
        .len()
        .is_some_and(|n| Value::from(n) == *expected)
}

// ============================================================================
// Transforms
// ============================================================================

fn len(value: &Value) -> Option<Value> {
    value.len().map(Value::from)
}

fn truthy(value: &Value) -> Option<Value> {
    Some(Value::Bool(value.truthy()))
}

fn max(value: &Value) -> Option<Value> {
    extremum(value, Ordering::Greater)
}

fn min(value: &Value) -> Option<Value> {
    extremum(value, Ordering::Less)
}

/// Largest or smallest list item, or character of a string.
///
/// Empty inputs and incomparable items have no extremum.
fn extremum(value: &Value, wanted: Ordering) -> Option<Value> {
    match value {
        Value::String(s) => {
            let c = if wanted == Ordering::Greater {
                s.chars().max()
            } else {
                s.chars().min()
            };
            c.map(Value::from)
        }
        Value::List(items) => {
            let (first, rest) = items.split_first()?;
            let mut best = first;
            for item in rest {
                if item.compare(best)? == wanted {
                    best = item;
                }
            }
            Some(best.clone())
        }
        _ => None,
    }
}

fn all(value: &Value) -> Option<Value> {
    value
        .as_list()
        .map(|items| Value::Bool(items.iter().all(Value::truthy)))
}

fn any(value: &Value) -> Option<Value> {
    value
        .as_list()
        .map(|items| Value::Bool(items.iter().any(Value::truthy)))
}

fn abs(value: &Value) -> Option<Value> {
    value.as_number().map(|n| Value::Number(n.abs()))
}

fn sum(value: &Value) -> Option<Value> {
    let items = value.as_list()?;
    let mut total = Number::I64(0);
    for item in items {
        total = total.sum_with(item.as_number()?);
    }
    Some(Value::Number(total))
}
