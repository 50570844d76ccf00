//! Records: the two shapes a collection element can take.
//!
//! A [`Record`] is either a string-keyed map or an object implementing
//! [`Queryable`]. Both shapes answer the same question, "what is the value
//! of field `name`?", through [`Record::get`], so a single collection may
//! mix them freely.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Trait for structs that can be queried as records.
///
/// This trait is typically derived using `#[derive(Queryable)]`, but can
/// also be implemented manually. Derived accessors (such as a computed
/// length) are answered the same way as stored fields.
///
/// # Manual Implementation
///
/// ```
/// use redbreast::{Queryable, Value};
///
/// struct Dog {
///     name: String,
///     number: f64,
/// }
///
/// impl Queryable for Dog {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(Value::from(&self.name)),
///             "number" => Some(Value::from(self.number)),
///             "shout" => Some(Value::from(self.name.to_uppercase())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Queryable: Send + Sync {
    /// Returns the value of a field or derived accessor.
    ///
    /// `None` means the record has no such field; the path resolver then
    /// tries a registered transform before giving up.
    fn field(&self, name: &str) -> Option<Value>;

    /// Name shown when the record is debug-printed.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A shared handle to one element of a collection.
///
/// Cloning a record is cheap: both variants are reference counted, and the
/// engine never mutates the data behind the handle.
///
/// Map records compare structurally; object records compare by identity.
#[derive(Clone)]
pub enum Record {
    /// A string-keyed map.
    Map(Arc<BTreeMap<String, Value>>),
    /// An arbitrary struct exposing its fields through [`Queryable`].
    Object(Arc<dyn Queryable>),
}

impl Record {
    /// Builds a map record from key/value pairs.
    ///
    /// ```
    /// use redbreast::{Record, Value};
    ///
    /// let dog = Record::map([("name", Value::from("Fido")), ("number", Value::from(15.72))]);
    /// assert_eq!(dog.get("name"), Some(Value::from("Fido")));
    /// assert_eq!(dog.get("owner"), None);
    /// ```
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Record::Map(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Wraps a struct as an object record.
    pub fn object<T: Queryable + 'static>(object: T) -> Self {
        Record::Object(Arc::new(object))
    }

    /// Looks up a field by name.
    ///
    /// Maps look the name up as a key, objects ask [`Queryable::field`].
    /// `None` signals absence; callers decide whether that is an error.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self {
            Record::Map(map) => map.get(name).cloned(),
            Record::Object(object) => object.field(name),
        }
    }

    /// Returns `true` for map records.
    pub fn is_map(&self) -> bool {
        matches!(self, Record::Map(_))
    }

    /// Returns `true` for object records.
    pub fn is_object(&self) -> bool {
        matches!(self, Record::Object(_))
    }

    /// Borrows the underlying map of a map record.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Record::Map(map) => Some(map),
            Record::Object(_) => None,
        }
    }

    /// Returns `true` if both handles point at the same record.
    pub fn ptr_eq(&self, other: &Record) -> bool {
        match (self, other) {
            (Record::Map(a), Record::Map(b)) => Arc::ptr_eq(a, b),
            (Record::Object(a), Record::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Record::Map(a), Record::Map(b)) => Arc::ptr_eq(a, b) || a == b,
            (Record::Object(_), Record::Object(_)) => self.ptr_eq(other),
            _ => false,
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Record::Object(object) => write!(f, "{} {{ .. }}", object.type_name()),
        }
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Record::Map(Arc::new(map))
    }
}

impl From<Arc<dyn Queryable>> for Record {
    fn from(object: Arc<dyn Queryable>) -> Self {
        Record::Object(object)
    }
}
