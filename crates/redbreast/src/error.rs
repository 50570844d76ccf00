//! Error types for the redbreast crate.

use thiserror::Error;

/// Errors that can occur when compiling or executing queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A path segment could not be resolved against a record.
    ///
    /// `filter` and `exclude` absorb this per record; `order_by` surfaces it.
    #[error("cannot resolve '{segment}' while following path '{path}'")]
    PathResolution { path: String, segment: String },

    /// An explicitly named operator has no registered comparator.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// A `regex` lookup carried a pattern that does not compile.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A lookup key or ordering spec produced an empty path segment.
    #[error("empty field path in '{0}'")]
    EmptyPath(String),

    /// `get` matched no records.
    #[error("matching record does not exist")]
    DoesNotExist,

    /// `get` matched more than one record.
    #[error("get() returned more than one record: it returned {0}")]
    MultipleObjectsReturned(usize),

    /// Two records produced ordering keys that cannot be compared.
    #[error("cannot order by '{field}': {left} and {right} values are not comparable")]
    IncomparableOrderingKeys {
        field: String,
        left: &'static str,
        right: &'static str,
    },

    /// A JSON collection element was not an object.
    #[error("expected a JSON object for every record, got {0}")]
    NotARecord(&'static str),
}

/// Result type for redbreast operations.
pub type Result<T> = std::result::Result<T, QueryError>;
