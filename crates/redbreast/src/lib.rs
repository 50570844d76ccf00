//! Redbreast - Django-style queries over in-memory collections.
//!
//! Redbreast filters, excludes, fetches and orders ordered collections of
//! records using string-keyed lookups such as `owner__name__len__gt`. It
//! supports:
//!
//! - Two record shapes, string-keyed maps and structs, mixed freely
//! - Chained paths across records that reference other records
//! - A global, extensible operator registry (`exact`, `gt`, `contains`, `len`, ...)
//! - Multi-key ordering with per-key direction and stable ties
//!
//! Every call evaluates immediately and returns a new list.
//!
//! # Quick Start
//!
//! ```rust
//! use redbreast::{query_args, QueryList, Queryable, Record, Value};
//!
//! struct Dog {
//!     name: String,
//!     owner: String,
//! }
//!
//! impl Queryable for Dog {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "name" => Some(Value::from(&self.name)),
//!             "owner" => Some(Value::from(&self.owner)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let dogs = QueryList::new(vec![
//!     Record::map([("name", "Fido"), ("owner", "Sam")]),
//!     Record::object(Dog { name: "Muttley".into(), owner: "Robin".into() }),
//!     Record::map([("name", "Biko"), ("owner", "Sam")]),
//! ]);
//!
//! let sams = dogs.filter(query_args! { owner = "Sam" }).unwrap();
//! assert_eq!(sams.len(), 2);
//!
//! let muttley = dogs.get(query_args! { name__len__gt = 4 }).unwrap();
//! assert_eq!(muttley.get("owner"), Some(Value::from("Robin")));
//!
//! let ordered = dogs.order_by(["-owner", "name"]).unwrap();
//! assert_eq!(ordered.first().and_then(|r| r.get("name")), Some(Value::from("Biko")));
//! ```
//!
//! # Lookup Keys
//!
//! A key is a path of segments joined by `__`. If the last segment names a
//! registered comparator it is the operator; otherwise the operator is
//! `exact`. Path segments are registered transforms where one exists,
//! fields otherwise; the final path segment prefers a field of that name.
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `name="Fido"` | `name == "Fido"` |
//! | `number__gt=30` | `number > 30` |
//! | `name__len=4` | `len(name) == 4` |
//! | `friend__owner__len__gt=5` | `len(friend.owner) > 5` |
//!
//! # Errors
//!
//! A record whose path does not resolve simply fails to match in
//! [`QueryList::filter`] (and is kept by [`QueryList::exclude`]). Invalid
//! lookups (including `regex` patterns that do not compile), `get`
//! cardinality and ordering failures come back as [`QueryError`].
//!
//! # Logging
//!
//! Events are emitted through [`tracing`]; install a subscriber to see them.

mod error;
mod ops;
mod ordering;
mod predicate;
mod query;
mod record;
mod registry;
mod resolve;
mod syntax;
mod value;

// Re-export public API
pub use error::{QueryError, Result};
pub use ordering::{compare_keys, Dir, OrderBy};
pub use predicate::{FieldPath, Predicate, QueryArgs, DEFAULT_OPERATOR};
pub use query::QueryList;
pub use record::{Queryable, Record};
pub use registry::{
    is_registered_operation, is_registered_transform, register_operation, register_transform,
    Comparator, OperatorRegistry, Transform,
};
pub use resolve::resolve;
pub use syntax::LookupSyntax;
pub use value::{Number, Value};

/// Derives [`Queryable`] for a struct with named fields.
///
/// Each field becomes a queryable field whose value is `Value::from` a clone
/// of it. `#[query(skip)]` hides a field and `#[query(rename = "...")]`
/// exposes it under another name. A `FIELD_NAME` constant is generated for
/// every exposed field.
#[cfg(feature = "macros")]
pub use redbreast_macros::Queryable;
