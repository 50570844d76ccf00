//! Ordering types for result sorting.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for path-based
//! ordering, plus the stable multi-key sort behind
//! [`QueryList::order_by`](crate::QueryList::order_by).

use std::cmp::Ordering;
use std::fmt;

use crate::error::{QueryError, Result};
use crate::predicate::FieldPath;
use crate::record::Record;
use crate::registry::OperatorRegistry;
use crate::resolve::resolve;
use crate::syntax::LookupSyntax;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering key: a path and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The path whose value is the sort key.
    pub path: FieldPath,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates an ordering with the given direction.
    pub fn new(path: FieldPath, dir: Dir) -> Self {
        OrderBy { path, dir }
    }

    /// Parses a spec such as `-name__len`.
    ///
    /// ```
    /// use redbreast::{Dir, LookupSyntax, OrderBy};
    ///
    /// let order = OrderBy::parse("-name__len", &LookupSyntax::default()).unwrap();
    /// assert_eq!(order.dir, Dir::Desc);
    /// assert_eq!(order.path.to_string(), "name__len");
    /// ```
    pub fn parse(spec: &str, syntax: &LookupSyntax) -> Result<Self> {
        let (dir, path) = syntax.direction(spec);
        let path = FieldPath::parse(path, syntax).map_err(|_| QueryError::EmptyPath(spec.to_string()))?;
        Ok(OrderBy { path, dir })
    }

    /// Compares two keys according to this ordering.
    ///
    /// Fails if the keys are of kinds that cannot be compared.
    pub fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        let ordering = a
            .compare(b)
            .ok_or_else(|| QueryError::IncomparableOrderingKeys {
                field: self.to_string(),
                left: a.kind(),
                right: b.kind(),
            })?;
        Ok(self.dir.apply(ordering))
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dir.is_desc() {
            f.write_str("-")?;
        }
        write!(f, "{}", self.path)
    }
}

/// Compares two key tuples using a list of orderings.
///
/// Uses the first ordering as the primary sort key, the second to break
/// ties, and so on. If every key compares equal, returns `Equal`.
pub fn compare_keys(a: &[Value], b: &[Value], orderings: &[OrderBy]) -> Result<Ordering> {
    for ((order_by, key_a), key_b) in orderings.iter().zip(a).zip(b) {
        match order_by.compare(key_a, key_b)? {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }
    Ok(Ordering::Equal)
}

/// Stably sorts records by the given orderings.
///
/// Every key is resolved once per record up front; a record missing any
/// key fails the whole sort, as does the first incomparable pair of keys.
pub(crate) fn sort_records(
    records: &[Record],
    orderings: &[OrderBy],
    registry: &OperatorRegistry,
) -> Result<Vec<Record>> {
    let mut keyed = records
        .iter()
        .map(|record| {
            let keys = orderings
                .iter()
                .map(|order_by| resolve(record, &order_by.path, registry))
                .collect::<Result<Vec<Value>>>()?;
            Ok((keys, record))
        })
        .collect::<Result<Vec<(Vec<Value>, &Record)>>>()?;

    let mut failure = None;
    keyed.sort_by(|(a, _), (b, _)| {
        if failure.is_some() {
            return Ordering::Equal;
        }
        compare_keys(a, b, orderings).unwrap_or_else(|err| {
            failure = Some(err);
            Ordering::Equal
        })
    });
    if let Some(err) = failure {
        return Err(err);
    }

    Ok(keyed.into_iter().map(|(_, record)| record.clone()).collect())
}
