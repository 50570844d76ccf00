//! Proc macros for redbreast.
//!
//! - [`Queryable`] - Expose a struct's fields as an object record
//!
//! The derive is re-exported by `redbreast` behind its default `macros`
//! feature, so most users never depend on this crate directly.

mod queryable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Queryable` trait for a struct with named fields.
///
/// Every field is queryable under its own name unless marked otherwise. The
/// field type must be `Clone` and convertible into `redbreast::Value`;
/// `Option<T>` fields that are `None` resolve to `Value::Null`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name in lookup keys |
///
/// # Struct Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `accessors(a, b, ...)` | Expose zero-argument methods as fields |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Dog::NAME`, `Dog::OWNER`)
/// 2. Implementation of `Queryable::field()` and `Queryable::type_name()`
///
/// # Example
///
/// ```ignore
/// use redbreast::{query_args, QueryList, Queryable};
///
/// #[derive(Queryable)]
/// #[query(accessors(shout))]
/// struct Dog {
///     name: String,
///     #[query(rename = "owner_name")]
///     owner: String,
///     #[query(skip)]
///     chip_id: u64,
/// }
///
/// impl Dog {
///     fn shout(&self) -> String {
///         self.name.to_uppercase()
///     }
/// }
///
/// let dogs = QueryList::from_objects(vec![
///     Dog { name: "Fido".into(), owner: "Sam".into(), chip_id: 1 },
/// ]);
/// assert!(dogs.exists(query_args! { owner_name = "Sam" }).unwrap());
/// assert!(dogs.exists(query_args! { shout = "FIDO" }).unwrap());
/// assert_eq!(Dog::OWNER_NAME, "owner_name");
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    queryable::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
