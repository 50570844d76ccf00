//! The process-wide operator registry.
//!
//! Every lookup suffix (`__gt`, `__len`, ...) is resolved by name against a
//! single registry shared by all [`QueryList`](crate::QueryList)s. A name
//! can carry two roles:
//!
//! - a **comparator** `(actual, expected) -> bool`, used when the name ends
//!   a lookup key (`number__gt=30`)
//! - a **transform** `value -> Option<value>`, used when the name appears
//!   inside a path and resolution continues from its result (`name__len__lte=6`)
//!
//! `len` is registered in both roles, so `name__len=4` and `name__len__gt=3`
//! both work.
//!
//! # Extending
//!
//! ```rust
//! use redbreast::{query_args, register_operation, QueryList, Record, Value};
//!
//! register_operation("longerthan", |actual: &Value, expected: &Value| {
//!     match (actual.len(), expected.as_number()) {
//!         (Some(len), Some(n)) => (len as f64) > n.to_f64(),
//!         _ => false,
//!     }
//! });
//!
//! let names = QueryList::new(vec![
//!     Record::map([("name", "foo")]),
//!     Record::map([("name", "fooooooooooooooo")]),
//! ]);
//! let long = names.filter(query_args! { name__longerthan = 3 }).unwrap();
//! assert_eq!(long.len(), 1);
//! ```
//!
//! # Concurrency
//!
//! Registration takes a write lock and is visible to every list, existing or
//! future, as soon as it returns. Queries hold a read lock for the duration
//! of one call, so a registered function must never call back into the
//! registration functions. It must not run queries either: a nested query
//! takes a second read lock, which can deadlock if a registration is
//! waiting for the write lock in between.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::ops;
use crate::value::Value;

/// A comparator: `(actual, expected) -> matched`.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// A transform: derives a value to keep resolving from, or `None` if it
/// does not apply to the input.
pub type Transform = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// The roles registered under one operator name.
#[derive(Clone, Default)]
struct Operator {
    comparator: Option<Comparator>,
    transform: Option<Transform>,
    /// The comparator is the built-in regex matcher, whose expected value
    /// is compiled once per query.
    pattern: bool,
}

/// A name → operator table.
///
/// The global instance is reached through [`register_operation`],
/// [`register_transform`] and [`QueryList`](crate::QueryList); standalone
/// instances are useful for compiling predicates in isolation.
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: HashMap<String, Operator>,
}

impl OperatorRegistry {
    /// Creates a registry with no operators at all.
    pub fn empty() -> Self {
        OperatorRegistry::default()
    }

    /// Creates a registry holding the built-in comparators and transforms.
    pub fn with_defaults() -> Self {
        let mut registry = OperatorRegistry::empty();
        for &(name, comparator) in ops::COMPARATORS {
            registry.insert_comparator(name, Arc::new(comparator));
        }
        for &(name, transform) in ops::TRANSFORMS {
            registry.insert_transform(name, Arc::new(transform));
        }
        if let Some(op) = registry.operators.get_mut(ops::PATTERN_OPERATOR) {
            op.pattern = true;
        }
        registry
    }

    /// Registers a comparator, replacing any comparator with the same name.
    pub fn register_operation<F>(&mut self, name: impl Into<String>, comparator: F)
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.insert_comparator(name, Arc::new(comparator));
    }

    /// Registers a transform, replacing any transform with the same name.
    pub fn register_transform<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.insert_transform(name, Arc::new(transform));
    }

    fn insert_comparator(&mut self, name: impl Into<String>, comparator: Comparator) {
        let op = self.operators.entry(name.into()).or_default();
        op.comparator = Some(comparator);
        op.pattern = false;
    }

    fn insert_transform(&mut self, name: impl Into<String>, transform: Transform) {
        self.operators.entry(name.into()).or_default().transform = Some(transform);
    }

    /// Looks up the comparator registered under `name`.
    pub fn comparator(&self, name: &str) -> Option<&Comparator> {
        self.operators.get(name)?.comparator.as_ref()
    }

    /// Looks up the transform registered under `name`.
    pub fn transform(&self, name: &str) -> Option<&Transform> {
        self.operators.get(name)?.transform.as_ref()
    }

    /// Returns `true` if `name` can end a lookup key.
    pub fn is_comparator(&self, name: &str) -> bool {
        self.comparator(name).is_some()
    }

    /// Returns `true` if `name` is still the built-in `regex` matcher.
    pub(crate) fn is_pattern(&self, name: &str) -> bool {
        self.operators.get(name).is_some_and(|op| op.pattern)
    }

    /// Returns `true` if `name` can appear inside a path.
    pub fn is_transform(&self, name: &str) -> bool {
        self.transform(name).is_some()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.names())
            .finish()
    }
}

static REGISTRY: Lazy<RwLock<OperatorRegistry>> =
    Lazy::new(|| RwLock::new(OperatorRegistry::with_defaults()));

/// Read access to the global registry for the duration of one query.
pub(crate) fn global() -> RwLockReadGuard<'static, OperatorRegistry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Registers a comparator in the global registry.
///
/// The name becomes usable as a lookup suffix (`field__name=value`) on
/// every list immediately; an existing comparator with that name is
/// replaced. Must not be called from inside a registered operator, and
/// registered operators must not query a [`QueryList`](crate::QueryList)
/// themselves (see the module docs on locking).
pub fn register_operation<F>(name: impl Into<String>, comparator: F)
where
    F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
{
    let name = name.into();
    debug!(operator = %name, "registering comparator");
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_operation(name, comparator);
}

/// Registers a transform in the global registry.
///
/// The name becomes usable inside paths (`field__name__gt=value`) on every
/// list immediately; an existing transform with that name is replaced.
/// Must not be called from inside a registered operator.
pub fn register_transform<F>(name: impl Into<String>, transform: F)
where
    F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
{
    let name = name.into();
    debug!(operator = %name, "registering transform");
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_transform(name, transform);
}

/// Returns `true` if the global registry has a comparator named `name`.
pub fn is_registered_operation(name: &str) -> bool {
    global().is_comparator(name)
}

/// Returns `true` if the global registry has a transform named `name`.
pub fn is_registered_transform(name: &str) -> bool {
    global().is_transform(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_baseline_operators() {
        let registry = OperatorRegistry::with_defaults();
        for name in ["exact", "gt", "gte", "lt", "lte", "ne", "contains", "in", "len"] {
            assert!(registry.is_comparator(name), "missing comparator {name}");
        }
        for name in ["len", "bool", "max", "min", "all", "any", "abs", "sum"] {
            assert!(registry.is_transform(name), "missing transform {name}");
        }
        assert!(!registry.is_transform("gt"));
        assert!(!registry.is_comparator("max"));
    }

    #[test]
    fn empty_registry_has_nothing() {
        let registry = OperatorRegistry::empty();
        assert!(registry.names().is_empty());
        assert!(registry.comparator("exact").is_none());
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = OperatorRegistry::with_defaults();
        let yes = Value::from(1);

        registry.register_operation("always", |_: &Value, _: &Value| false);
        registry.register_operation("always", |_: &Value, _: &Value| true);

        let always = registry.comparator("always").expect("registered");
        assert!(always(&yes, &yes));
    }

    #[test]
    fn roles_are_independent() {
        let mut registry = OperatorRegistry::with_defaults();
        registry.register_transform("len", |_: &Value| Some(Value::from(99)));

        // Comparator role of `len` untouched
        let len_eq = registry.comparator("len").expect("comparator kept");
        assert!(len_eq(&Value::from("Fido"), &Value::from(4)));

        let len = registry.transform("len").expect("transform replaced");
        assert_eq!(len(&Value::from("Fido")), Some(Value::from(99)));
    }

    #[test]
    fn only_the_builtin_regex_is_a_pattern() {
        let mut registry = OperatorRegistry::with_defaults();
        assert!(registry.is_pattern("regex"));
        assert!(!registry.is_pattern("exact"));
        assert!(!registry.is_pattern("missing"));

        registry.register_operation("regex", |_: &Value, _: &Value| true);
        assert!(!registry.is_pattern("regex"));
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = OperatorRegistry::empty();
        registry.register_transform("zeta", |v: &Value| Some(v.clone()));
        registry.register_operation("alpha", |_: &Value, _: &Value| true);
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn debug_lists_names() {
        let mut registry = OperatorRegistry::empty();
        registry.register_operation("gt", |_: &Value, _: &Value| true);
        assert_eq!(
            format!("{registry:?}"),
            r#"OperatorRegistry { operators: ["gt"] }"#
        );
    }
}
