//! Lookup key syntax.

use crate::ordering::Dir;

/// How lookup keys and ordering specs are spelled.
///
/// The default is Django's: `__` between path segments and a leading `-`
/// for descending order (`owner__name__len__gt`, `-number`).
///
/// ```
/// use redbreast::{query_args, LookupSyntax, QueryList, Record};
///
/// let dogs = QueryList::new(vec![Record::map([("name", "Fido")])])
///     .with_syntax(LookupSyntax::new(".", '~'));
/// let fido = dogs.get(query_args! { name = "Fido" }).unwrap();
/// assert_eq!(fido.get("name").unwrap().as_str(), Some("Fido"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSyntax {
    delimiter: &'static str,
    descending_prefix: char,
}

impl LookupSyntax {
    /// `__` delimiter, `-` descending prefix.
    pub const DJANGO: LookupSyntax = LookupSyntax::new("__", '-');

    /// Creates a syntax. An empty delimiter disables path splitting.
    pub const fn new(delimiter: &'static str, descending_prefix: char) -> Self {
        LookupSyntax {
            delimiter,
            descending_prefix,
        }
    }

    /// The path segment delimiter.
    pub fn delimiter(&self) -> &'static str {
        self.delimiter
    }

    /// The prefix marking a descending ordering spec.
    pub fn descending_prefix(&self) -> char {
        self.descending_prefix
    }

    /// Splits a lookup key into its raw segments.
    pub fn split<'a>(&self, key: &'a str) -> Vec<&'a str> {
        if self.delimiter.is_empty() {
            return vec![key];
        }
        key.split(self.delimiter).collect()
    }

    /// Joins path segments back into a key.
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let mut key = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                key.push_str(self.delimiter);
            }
            key.push_str(segment.as_ref());
        }
        key
    }

    /// Strips the descending prefix from an ordering spec.
    pub fn direction<'a>(&self, spec: &'a str) -> (Dir, &'a str) {
        match spec.strip_prefix(self.descending_prefix) {
            Some(rest) => (Dir::Desc, rest),
            None => (Dir::Asc, spec),
        }
    }
}

impl Default for LookupSyntax {
    fn default() -> Self {
        LookupSyntax::DJANGO
    }
}
