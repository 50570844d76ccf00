//! Test helpers for code built on redbreast.
//!
//! - [`Case`] and [`parametrize`] build table-driven test rows from labeled,
//!   named values and check every row carries exactly the expected names
//! - [`set_difference`] and [`assert_maps_equal`] report only what differs
//!
//! # Example
//!
//! ```
//! use redbreast::{query_args, QueryList, Record, Value};
//! use redbreast_test::{parametrize, Case};
//!
//! let dogs = QueryList::new(vec![
//!     Record::map([("name", Value::from("Fido")), ("number", Value::from(15.72))]),
//!     Record::map([("name", Value::from("Buster")), ("number", Value::from(71.19))]),
//! ]);
//!
//! let rows = parametrize(
//!     "threshold, expected",
//!     vec![
//!         Case::new().id("all").with("threshold", 0).with("expected", 2),
//!         Case::new().id("one").with("threshold", 50).with("expected", 1),
//!         Case::new().id("none").with("threshold", 100).with("expected", 0),
//!     ],
//! )
//! .unwrap();
//!
//! for row in rows {
//!     let found = dogs
//!         .filter(query_args! { number__gt = row["threshold"].clone() })
//!         .unwrap();
//!     assert_eq!(Value::from(found.len()), row["expected"], "case {:?}", row.id());
//! }
//! ```

mod diff;
mod params;

pub use diff::{assert_maps_equal, diff_maps, set_difference, MapDiff};
pub use params::{parametrize, ArgNames, Case, ParamError, Params};
