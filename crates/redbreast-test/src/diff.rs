//! Set and map comparisons with readable failure messages.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use redbreast::Value;

/// Symmetric difference of two collections.
///
/// Handy for asserting that a set of keys is exactly the expected one: the
/// failure message lists only what differs.
///
/// ```
/// use redbreast_test::set_difference;
///
/// let diff = set_difference([3, 2, 1], [1, 2, 4]);
/// assert_eq!(diff.into_iter().collect::<Vec<_>>(), vec![3, 4]);
/// ```
pub fn set_difference<T, A, B>(a: A, b: B) -> BTreeSet<T>
where
    T: Ord,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let a: BTreeSet<T> = a.into_iter().collect();
    let mut b: BTreeSet<T> = b.into_iter().collect();
    let mut difference = BTreeSet::new();
    for item in a {
        if !b.remove(&item) {
            difference.insert(item);
        }
    }
    difference.extend(b);
    difference
}

/// The first difference found between two maps.
#[derive(Debug, Clone, PartialEq)]
pub enum MapDiff {
    /// Keys present in only one of the maps.
    Keys(Vec<String>),
    /// A key whose values differ: `(key, left, right)`.
    Value { key: String, left: Value, right: Value },
}

impl fmt::Display for MapDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapDiff::Keys(keys) => {
                write!(f, "these keys are not present in both maps: {keys:?}")
            }
            MapDiff::Value { key, left, right } => {
                write!(f, "values don't match for key '{key}': {right} != {left}")
            }
        }
    }
}

/// Finds the first difference between two maps, descending into nested
/// map records.
///
/// Values compare with [`Value`]'s equality: `3` equals `3.0`, but `true`
/// never equals `1`.
pub fn diff_maps(a: &BTreeMap<String, Value>, b: &BTreeMap<String, Value>) -> Option<MapDiff> {
    if a == b {
        return None;
    }

    let keys = set_difference(a.keys(), b.keys());
    if !keys.is_empty() {
        return Some(MapDiff::Keys(keys.into_iter().cloned().collect()));
    }

    for (key, left) in a {
        let right = b.get(key)?;
        let nested = (
            left.as_record().and_then(|r| r.as_map()),
            right.as_record().and_then(|r| r.as_map()),
        );
        if let (Some(left), Some(right)) = nested {
            if let Some(diff) = diff_maps(left, right) {
                return Some(diff);
            }
        } else if left != right {
            return Some(MapDiff::Value {
                key: key.clone(),
                left: left.clone(),
                right: right.clone(),
            });
        }
    }
    None
}

/// Asserts two maps are equal, naming the first differing key on failure.
///
/// ```should_panic
/// use std::collections::BTreeMap;
/// use redbreast::Value;
/// use redbreast_test::assert_maps_equal;
///
/// let a = BTreeMap::from([("bar".to_string(), Value::from("bar"))]);
/// let b = BTreeMap::from([("bar".to_string(), Value::from("baz"))]);
/// assert_maps_equal(&a, &b);
/// ```
#[track_caller]
pub fn assert_maps_equal(a: &BTreeMap<String, Value>, b: &BTreeMap<String, Value>) {
    if let Some(diff) = diff_maps(a, b) {
        panic!("{diff}");
    }
}
