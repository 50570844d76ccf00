//! The queryable collection.
//!
//! A [`QueryList`] is an ordered collection of [`Record`]s with eager,
//! Django-style query methods. Every narrowing or reordering call returns a
//! new list; the receiver is never modified.

use std::ops::Index;
use std::slice;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{QueryError, Result};
use crate::ordering::{sort_records, OrderBy};
use crate::predicate::{Predicate, QueryArgs};
use crate::record::{Queryable, Record};
use crate::registry::{self, OperatorRegistry};
use crate::syntax::LookupSyntax;
use crate::value::Value;

/// An ordered, immutable collection of records.
///
/// # Example
///
/// ```
/// use redbreast::{query_args, QueryList, Record, Value};
///
/// let dogs = QueryList::new(vec![
///     Record::map([("name", Value::from("Fido")), ("number", Value::from(15.72))]),
///     Record::map([("name", Value::from("Muttley")), ("number", Value::from(31.44))]),
///     Record::map([("name", Value::from("Biko")), ("number", Value::from(47.17))]),
///     Record::map([("name", Value::from("Buster")), ("number", Value::from(71.19))]),
/// ]);
///
/// let middle = dogs.filter(query_args! { number__gt = 30, number__lt = 70 }).unwrap();
/// assert_eq!(middle.len(), 2);
///
/// let by_name = dogs.order_by(["-name__len", "name"]).unwrap();
/// assert_eq!(by_name[0].get("name"), Some(Value::from("Muttley")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryList {
    records: Vec<Record>,
    syntax: LookupSyntax,
}

impl QueryList {
    /// Creates a list over the given records, in the given order.
    pub fn new(records: Vec<Record>) -> Self {
        QueryList {
            records,
            syntax: LookupSyntax::default(),
        }
    }

    /// Creates a list of object records.
    pub fn from_objects<T, I>(objects: I) -> Self
    where
        T: Queryable + 'static,
        I: IntoIterator<Item = T>,
    {
        objects.into_iter().map(Record::object).collect()
    }

    /// Creates a list of map records from a JSON array of objects.
    ///
    /// A single object is accepted as a one-record list.
    ///
    /// ```
    /// use redbreast::{query_args, QueryList};
    ///
    /// let people = QueryList::from_json(serde_json::json!([
    ///     {"name": "Jane", "age": 31},
    ///     {"name": "Johnny", "age": 12},
    /// ]))
    /// .unwrap();
    /// assert!(people.exists(query_args! { age__lt = 18 }).unwrap());
    /// ```
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        let items = match json {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };
        items
            .into_iter()
            .map(|item| match Value::from(item) {
                Value::Record(record) => Ok(record),
                other => Err(QueryError::NotARecord(other.kind())),
            })
            .collect()
    }

    /// Replaces the lookup syntax used by this list and every list derived
    /// from it.
    pub fn with_syntax(mut self, syntax: LookupSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// The lookup syntax in use.
    pub fn syntax(&self) -> LookupSyntax {
        self.syntax
    }

    fn derive(&self, records: Vec<Record>) -> QueryList {
        QueryList {
            records,
            syntax: self.syntax,
        }
    }

    // ========================================================================
    // Querying
    // ========================================================================

    /// Keeps the records matching every lookup.
    ///
    /// A record whose path does not resolve does not match. Fails only if
    /// the arguments themselves are invalid, such as an empty path or a
    /// `regex` pattern that does not compile.
    pub fn filter(&self, args: QueryArgs) -> Result<QueryList> {
        self.select(&args, true)
    }

    /// Keeps the records that [`filter`](Self::filter) would drop.
    ///
    /// Records whose paths do not resolve are kept.
    pub fn exclude(&self, args: QueryArgs) -> Result<QueryList> {
        self.select(&args, false)
    }

    fn select(&self, args: &QueryArgs, keep_matching: bool) -> Result<QueryList> {
        let registry = registry::global();
        let predicates = args.compile(&self.syntax, &registry)?;
        debug!(
            args = args.len(),
            predicates = predicates.len(),
            records = self.records.len(),
            exclude = !keep_matching,
            "running query"
        );

        let mut selected = Vec::new();
        for record in &self.records {
            if matches_all(record, &predicates, &registry)? == keep_matching {
                selected.push(record.clone());
            }
        }
        Ok(self.derive(selected))
    }

    /// Returns the single record matching the lookups.
    ///
    /// # Errors
    ///
    /// [`QueryError::DoesNotExist`] if nothing matches,
    /// [`QueryError::MultipleObjectsReturned`] if more than one record does.
    pub fn get(&self, args: QueryArgs) -> Result<&Record> {
        let registry = registry::global();
        let predicates = args.compile(&self.syntax, &registry)?;

        let mut found = None;
        let mut count = 0;
        for record in &self.records {
            if matches_all(record, &predicates, &registry)? {
                count += 1;
                found.get_or_insert(record);
            }
        }
        match (found, count) {
            (Some(record), 1) => Ok(record),
            (None, _) => Err(QueryError::DoesNotExist),
            (Some(_), n) => Err(QueryError::MultipleObjectsReturned(n)),
        }
    }

    /// Returns `true` if any record matches the lookups.
    pub fn exists(&self, args: QueryArgs) -> Result<bool> {
        let registry = registry::global();
        let predicates = args.compile(&self.syntax, &registry)?;
        for record in &self.records {
            if matches_all(record, &predicates, &registry)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns a list in a new order.
    ///
    /// Each spec is a path, optionally prefixed with `-` for descending
    /// order. The first spec is the primary key and later ones break ties;
    /// records with equal keys keep their relative order.
    ///
    /// # Errors
    ///
    /// Unlike filtering, every record must resolve every path
    /// ([`QueryError::PathResolution`]) and keys at the same position must
    /// be comparable ([`QueryError::IncomparableOrderingKeys`]).
    pub fn order_by<I, S>(&self, specs: I) -> Result<QueryList>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let orderings = specs
            .into_iter()
            .map(|spec| OrderBy::parse(spec.as_ref(), &self.syntax))
            .collect::<Result<Vec<_>>>()?;
        debug!(keys = orderings.len(), records = self.records.len(), "ordering");
        let registry = registry::global();
        let sorted = sort_records(&self.records, &orderings, &registry)?;
        Ok(self.derive(sorted))
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// A copy of this list holding the same records.
    pub fn all(&self) -> QueryList {
        self.clone()
    }

    /// The first record, if any.
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// The last record, if any.
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<Record> {
        self.records
    }

    // ========================================================================
    // Extension
    // ========================================================================

    /// Registers a comparator for every list. See [`register_operation`](crate::register_operation).
    pub fn register_operation<F>(name: impl Into<String>, comparator: F)
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        registry::register_operation(name, comparator);
    }

    /// Registers a transform for every list. See [`register_transform`](crate::register_transform).
    pub fn register_transform<F>(name: impl Into<String>, transform: F)
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        registry::register_transform(name, transform);
    }
}

/// ANDs predicates over one record, absorbing path failures as non-matches.
fn matches_all(record: &Record, predicates: &[Predicate], registry: &OperatorRegistry) -> Result<bool> {
    for predicate in predicates {
        match predicate.evaluate(record, registry) {
            Ok(true) => {}
            Ok(false) => return Ok(false),
            Err(QueryError::PathResolution { path, segment }) => {
                trace!(%path, %segment, "path did not resolve; record does not match");
                return Ok(false);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}

impl PartialEq for QueryList {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl PartialEq<Vec<Record>> for QueryList {
    fn eq(&self, other: &Vec<Record>) -> bool {
        &self.records == other
    }
}

impl PartialEq<[Record]> for QueryList {
    fn eq(&self, other: &[Record]) -> bool {
        self.records.as_slice() == other
    }
}

impl From<Vec<Record>> for QueryList {
    fn from(records: Vec<Record>) -> Self {
        QueryList::new(records)
    }
}

impl From<Vec<Arc<dyn Queryable>>> for QueryList {
    fn from(objects: Vec<Arc<dyn Queryable>>) -> Self {
        objects.into_iter().map(Record::Object).collect()
    }
}

impl FromIterator<Record> for QueryList {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        QueryList::new(iter.into_iter().collect())
    }
}

impl IntoIterator for QueryList {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryList {
    type Item = &'a Record;
    type IntoIter = slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Index<usize> for QueryList {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_args;

    fn dog(name: &str, owner: &str, number: f64) -> Record {
        Record::map([
            ("name", Value::from(name)),
            ("owner", Value::from(owner)),
            ("number", Value::from(number)),
        ])
    }

    fn dogs() -> QueryList {
        QueryList::new(vec![
            dog("Fido", "Sam", 15.72),
            dog("Muttley", "Robin", 31.44),
            dog("Biko", "Sam", 47.17),
            dog("Buster", "Robin", 71.19),
        ])
    }

    fn names(list: &QueryList) -> Vec<String> {
        list.iter()
            .filter_map(|r| r.get("name").and_then(|v| v.as_str().map(str::to_string)))
            .collect()
    }

    #[test]
    fn filter_between() {
        let result = dogs().filter(query_args! { number__gt = 30, number__lt = 70 }).unwrap();
        assert_eq!(names(&result), ["Muttley", "Biko"]);
    }

    #[test]
    fn exclude_is_complement() {
        let result = dogs().exclude(query_args! { owner = "Sam" }).unwrap();
        assert_eq!(names(&result), ["Muttley", "Buster"]);
    }

    #[test]
    fn empty_args_match_everything() {
        assert_eq!(dogs().filter(query_args! {}).unwrap(), dogs());
        assert!(dogs().exclude(query_args! {}).unwrap().is_empty());
    }

    #[test]
    fn unresolvable_paths_are_absorbed() {
        let list = QueryList::new(vec![dog("Fido", "Sam", 15.72), Record::map([("other", 1)])]);

        assert_eq!(names(&list.filter(query_args! { name__len = 4 }).unwrap()), ["Fido"]);
        let excluded = list.exclude(query_args! { name__len = 4 }).unwrap();
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].get("other"), Some(Value::from(1)));
    }

    #[test]
    fn unknown_explicit_operator_fails() {
        let err = dogs()
            .filter(QueryArgs::new().lookup("name", "inside", "Fido"))
            .unwrap_err();
        assert_eq!(err, QueryError::UnknownOperator("inside".to_string()));
    }

    #[test]
    fn get_single() {
        let list = dogs();
        let fido = list.get(query_args! { name = "Fido" }).unwrap();
        assert_eq!(fido.get("number"), Some(Value::from(15.72)));
    }

    #[test]
    fn get_errors() {
        assert_eq!(
            dogs().get(query_args! { name = "Rex" }).unwrap_err(),
            QueryError::DoesNotExist
        );
        assert_eq!(
            dogs().get(query_args! { owner = "Sam" }).unwrap_err(),
            QueryError::MultipleObjectsReturned(2)
        );
    }

    #[test]
    fn first_last_all() {
        let list = dogs();
        assert_eq!(list.first().and_then(|r| r.get("name")), Some(Value::from("Fido")));
        assert_eq!(list.last().and_then(|r| r.get("name")), Some(Value::from("Buster")));
        assert_eq!(list.all(), list);

        let empty = QueryList::default();
        assert!(empty.first().is_none());
        assert!(empty.last().is_none());
    }

    #[test]
    fn exists() {
        assert!(dogs().exists(query_args! { owner = "Robin" }).unwrap());
        assert!(!dogs().exists(query_args! { owner = "Nobody" }).unwrap());
    }

    #[test]
    fn order_by_single_and_multiple_keys() {
        let list = dogs();
        assert_eq!(names(&list.order_by(["name"]).unwrap()), ["Biko", "Buster", "Fido", "Muttley"]);
        assert_eq!(
            names(&list.order_by(["-number"]).unwrap()),
            ["Buster", "Biko", "Muttley", "Fido"]
        );
        assert_eq!(
            names(&list.order_by(["owner", "-number"]).unwrap()),
            ["Buster", "Muttley", "Biko", "Fido"]
        );
        assert_eq!(
            names(&list.order_by(["name__len", "-name"]).unwrap()),
            ["Fido", "Biko", "Buster", "Muttley"]
        );
    }

    #[test]
    fn order_by_leaves_receiver_untouched() {
        let list = dogs();
        let _ = list.order_by(["-number"]).unwrap();
        assert_eq!(names(&list), ["Fido", "Muttley", "Biko", "Buster"]);
    }

    #[test]
    fn order_by_missing_field_fails() {
        assert!(matches!(
            dogs().order_by(["age"]),
            Err(QueryError::PathResolution { .. })
        ));
    }

    #[test]
    fn syntax_carries_to_derived_lists() {
        let list = dogs().with_syntax(LookupSyntax::new(".", '~'));
        let narrowed = list
            .filter(QueryArgs::new().arg("name.len.gt", 4))
            .unwrap();
        assert_eq!(narrowed.syntax(), list.syntax());
        assert_eq!(names(&narrowed.order_by(["~name"]).unwrap()), ["Muttley", "Buster"]);
    }

    #[test]
    fn from_json_rejects_scalars() {
        assert_eq!(
            QueryList::from_json(serde_json::json!([{"a": 1}, 2])).unwrap_err(),
            QueryError::NotARecord("number")
        );
        assert_eq!(QueryList::from_json(serde_json::json!({"a": 1})).unwrap().len(), 1);
    }

    #[test]
    fn collection_traits() {
        let list: QueryList = dogs().into_iter().rev().collect();
        assert_eq!(names(&list)[0], "Buster");
        assert_eq!((&list).into_iter().count(), 4);
        assert_eq!(list.count(), 4);
        let records = list.clone().into_vec();
        assert_eq!(list, records);
        assert_eq!(list, *records.as_slice());
    }
}
