//! Field path resolution.
//!
//! A path is walked left to right, one segment per step, starting from the
//! record itself. At each step:
//!
//! 1. if a transform is registered under the segment's name and more
//!    segments follow, its result becomes current
//! 2. otherwise, if the current value is a record with a field named like
//!    the segment, that field's value becomes current
//! 3. otherwise a transform of that name, if any, is applied
//! 4. otherwise resolution fails at that segment
//!
//! So `len__abs` takes the length of the record itself, while a lone `len`
//! still reaches a field called `len` when the record has one.
//!
//! Record values returned by a field are followed like any other, which is
//! what makes `friend__friend__name__len` work across record references.

use crate::error::{QueryError, Result};
use crate::predicate::FieldPath;
use crate::record::Record;
use crate::registry::OperatorRegistry;
use crate::value::Value;

/// Resolves `path` against `record`.
///
/// ```
/// use redbreast::{resolve, FieldPath, LookupSyntax, OperatorRegistry, Record, Value};
///
/// let fido = Record::map([
///     ("name", Value::from("Fido")),
///     ("friend", Value::from(Record::map([("owner", "Robin")]))),
/// ]);
/// let path = FieldPath::parse("friend__owner__len", &LookupSyntax::default()).unwrap();
/// let value = resolve(&fido, &path, &OperatorRegistry::with_defaults()).unwrap();
/// assert_eq!(value, Value::from(5));
/// ```
pub fn resolve(record: &Record, path: &FieldPath, registry: &OperatorRegistry) -> Result<Value> {
    let mut current = Value::Record(record.clone());
    let last = path.len() - 1;
    for (i, segment) in path.segments().iter().enumerate() {
        current = step(&current, segment, i == last, registry).ok_or_else(|| {
            QueryError::PathResolution {
                path: path.to_string(),
                segment: segment.clone(),
            }
        })?;
    }
    Ok(current)
}

fn step(
    current: &Value,
    segment: &str,
    is_last: bool,
    registry: &OperatorRegistry,
) -> Option<Value> {
    let transform = registry.transform(segment);
    if let (Some(transform), false) = (transform, is_last) {
        return transform(current);
    }
    if let Value::Record(record) = current {
        if let Some(value) = record.get(segment) {
            return Some(value);
        }
    }
    transform?(current)
}
