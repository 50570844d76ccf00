//! Lookup arguments and their compilation into predicates.
//!
//! A lookup key such as `friend__owner__len__gt` is split on the delimiter
//! and its trailing segment checked against the registry: if it names a
//! comparator it becomes the operator, otherwise the whole key is a path
//! compared with `exact`. Compilation never touches records, so adding an
//! operator needs no parser changes.
//!
//! A field that shares its name with a comparator cannot be reached as the
//! last segment of a key (`stats__gt` always means "stats greater than").
//! Spell the comparison explicitly (`stats__gt__exact`) or use
//! [`QueryArgs::lookup`].

use std::fmt;

use regex::Regex;
use tracing::trace;

use crate::error::{QueryError, Result};
use crate::record::Record;
use crate::registry::OperatorRegistry;
use crate::resolve::resolve;
use crate::syntax::LookupSyntax;
use crate::value::Value;

/// The operator used when a key names no comparator.
pub const DEFAULT_OPERATOR: &str = "exact";

/// A non-empty sequence of path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a path (without operator) from a key.
    ///
    /// Fails with [`QueryError::EmptyPath`] if any segment is empty.
    pub fn parse(key: &str, syntax: &LookupSyntax) -> Result<Self> {
        FieldPath::from_segments(syntax.split(key), key)
    }

    fn from_segments<S: Into<String>>(raw: Vec<S>, key: &str) -> Result<Self> {
        let segments: Vec<String> = raw.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(QueryError::EmptyPath(key.to_string()));
        }
        Ok(FieldPath { segments })
    }

    /// The segments, first to last.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; paths have at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Displays with the default `__` delimiter.
impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&LookupSyntax::DJANGO.join(&self.segments))
    }
}

/// A compiled `(path, operator, expected)` triple.
///
/// `regex` lookups also carry their compiled pattern, so it is parsed once
/// per query rather than once per record.
#[derive(Debug, Clone)]
pub struct Predicate {
    /// Where to find the actual value.
    pub path: FieldPath,
    /// Comparator name in the registry.
    pub operator: String,
    /// The value the caller supplied.
    pub expected: Value,
    pattern: Option<Regex>,
}

impl Predicate {
    /// Evaluates this predicate against one record.
    ///
    /// Path failures come back as [`QueryError::PathResolution`] so callers
    /// can choose to absorb them.
    pub fn evaluate(&self, record: &Record, registry: &OperatorRegistry) -> Result<bool> {
        let comparator = registry
            .comparator(&self.operator)
            .ok_or_else(|| QueryError::UnknownOperator(self.operator.clone()))?;
        let actual = resolve(record, &self.path, registry)?;
        if let Some(pattern) = &self.pattern {
            return Ok(actual.as_str().is_some_and(|s| pattern.is_match(s)));
        }
        Ok(comparator(&actual, &self.expected))
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.operator == other.operator && self.expected == other.expected
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ArgKey {
    /// `path[__operator]`, split at compile time.
    Lookup(String),
    /// Path and operator given separately.
    Explicit { path: String, operator: String },
}

/// Ordered query arguments: Rust's stand-in for `filter(**kwargs)`.
///
/// Build with [`query_args!`](crate::query_args), the [`arg`](Self::arg)
/// builder, or by collecting `(key, value)` pairs.
///
/// ```
/// use redbreast::{query_args, QueryArgs};
///
/// let a = query_args! { number__gt = 30, number__lt = 70 };
/// let b = QueryArgs::new().arg("number__gt", 30).arg("number__lt", 70);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryArgs {
    args: Vec<(ArgKey, Value)>,
}

impl QueryArgs {
    /// Creates empty arguments, which match every record.
    pub fn new() -> Self {
        QueryArgs::default()
    }

    /// Adds a `path[__operator]` lookup.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push((ArgKey::Lookup(key.into()), value.into()));
        self
    }

    /// Adds a lookup with an explicitly named operator.
    ///
    /// Unlike [`arg`](Self::arg), the operator is not guessed from the key,
    /// so fields named like operators stay reachable, and an unregistered
    /// operator is reported as [`QueryError::UnknownOperator`].
    pub fn lookup(
        mut self,
        path: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let key = ArgKey::Explicit {
            path: path.into(),
            operator: operator.into(),
        };
        self.args.push((key, value.into()));
        self
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Compiles the arguments into predicates, in argument order.
    pub fn compile(
        &self,
        syntax: &LookupSyntax,
        registry: &OperatorRegistry,
    ) -> Result<Vec<Predicate>> {
        self.args
            .iter()
            .map(|(key, value)| compile_arg(key, value, syntax, registry))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(QueryArgs::new(), |args, (k, v)| args.arg(k, v))
    }
}

fn compile_arg(
    key: &ArgKey,
    value: &Value,
    syntax: &LookupSyntax,
    registry: &OperatorRegistry,
) -> Result<Predicate> {
    let (path, operator) = match key {
        ArgKey::Lookup(key) => {
            let mut segments = syntax.split(key);
            let trailing = match segments.last() {
                Some(last) if segments.len() > 1 && registry.is_comparator(last) => {
                    Some(last.to_string())
                }
                _ => None,
            };
            let operator = match trailing {
                Some(op) => {
                    segments.pop();
                    op
                }
                None => DEFAULT_OPERATOR.to_string(),
            };
            (FieldPath::from_segments(segments, key)?, operator)
        }
        ArgKey::Explicit { path, operator } => {
            if !registry.is_comparator(operator) {
                return Err(QueryError::UnknownOperator(operator.clone()));
            }
            (FieldPath::parse(path, syntax)?, operator.clone())
        }
    };
    let pattern = match value {
        Value::String(source) if registry.is_pattern(&operator) => Some(Regex::new(source)?),
        _ => None,
    };
    trace!(path = %path, %operator, "compiled lookup");
    Ok(Predicate {
        path,
        operator,
        expected: value.clone(),
        pattern,
    })
}

/// Builds [`QueryArgs`] from `key = value` pairs.
///
/// Keys are identifiers; they are passed through `stringify!`, so
/// `number__gt = 30` becomes the lookup `"number__gt"`.
///
/// ```
/// use redbreast::query_args;
///
/// let args = query_args! { owner = "Sam", number__lt = 40 };
/// assert_eq!(args.len(), 2);
/// assert!(query_args! {}.is_empty());
/// ```
#[macro_export]
macro_rules! query_args {
    () => {
        $crate::QueryArgs::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::QueryArgs::new()$(.arg(stringify!($key), $value))+
    };
}
