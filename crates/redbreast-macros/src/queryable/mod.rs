//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! Generates a `Queryable` impl that answers every named field (and any
//! listed accessor method) by converting a clone of it into a `Value`.

mod attrs;
mod derive;

pub use derive::queryable_derive_impl;
