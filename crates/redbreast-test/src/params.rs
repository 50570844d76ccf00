//! Labeled parameter cases for table-driven tests.
//!
//! A [`Case`] names its values instead of listing them positionally, so a
//! table stays readable when it grows columns. [`parametrize`] checks every
//! case against the expected names and lines the values up in name order.

use std::collections::BTreeMap;
use std::ops::Index;
use std::sync::Arc;

use redbreast::Value;
use thiserror::Error;

/// A case whose fields do not match the expected argument names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("case with id={} is missing these fields: {names:?}", display_id(.id))]
    Missing { id: Option<String>, names: Vec<String> },

    #[error("case with id={} received unexpected fields: {names:?}", display_id(.id))]
    Unexpected { id: Option<String>, names: Vec<String> },
}

fn display_id(id: &Option<String>) -> String {
    match id {
        Some(id) => format!("{id:?}"),
        None => "None".to_string(),
    }
}

/// One labeled row of test data.
///
/// ```
/// use redbreast_test::Case;
///
/// let case = Case::new().id("first").with("a", 1).with("b", "two");
/// assert_eq!(case.label(), Some("first"));
/// assert_eq!(case.fields().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Case {
    id: Option<String>,
    fields: BTreeMap<String, Value>,
}

impl Case {
    pub fn new() -> Self {
        Case::default()
    }

    /// Sets the label shown for this case.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds or replaces a named value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

/// Expected argument names, in positional order.
///
/// Built from a comma-separated string (`"a, b"` or `"a,b"`) or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgNames(Vec<String>);

impl ArgNames {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for ArgNames {
    fn from(names: &str) -> Self {
        ArgNames(
            names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<String> for ArgNames {
    fn from(names: String) -> Self {
        ArgNames::from(names.as_str())
    }
}

impl<S: Into<String>> From<Vec<S>> for ArgNames {
    fn from(names: Vec<S>) -> Self {
        ArgNames(names.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for ArgNames {
    fn from(names: [S; N]) -> Self {
        ArgNames(names.into_iter().map(Into::into).collect())
    }
}

/// One case's values, in argument-name order.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    id: Option<String>,
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Params {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Values in argument-name order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Looks a value up by argument name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let position = self.names.iter().position(|n| n == name)?;
        self.values.get(position)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<usize> for Params {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

/// Panics if `name` is not an argument name.
impl Index<&str> for Params {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no parameter named '{name}'"),
        }
    }
}

/// Checks each case against `argnames` and orders its values to match.
///
/// A case must carry exactly the named fields; missing names are reported
/// before unexpected ones.
///
/// ```
/// use redbreast::Value;
/// use redbreast_test::{parametrize, Case};
///
/// let rows = parametrize(
///     "one, two",
///     vec![
///         Case::new().id("in order").with("one", 1).with("two", 2),
///         Case::new().with("two", 2).with("one", 1),
///     ],
/// )
/// .unwrap();
///
/// for row in &rows {
///     assert_eq!(row[0], Value::from(1));
///     assert_eq!(row["two"], Value::from(2));
/// }
/// ```
pub fn parametrize<A, I>(argnames: A, cases: I) -> Result<Vec<Params>, ParamError>
where
    A: Into<ArgNames>,
    I: IntoIterator<Item = Case>,
{
    let ArgNames(names) = argnames.into();
    let names: Arc<[String]> = names.into();

    cases
        .into_iter()
        .map(|case| {
            let missing = sorted(names.iter().filter(|n| !case.fields.contains_key(*n)));
            if !missing.is_empty() {
                return Err(ParamError::Missing {
                    id: case.id,
                    names: missing,
                });
            }
            let unexpected = sorted(case.fields.keys().filter(|k| !names.contains(k)));
            if !unexpected.is_empty() {
                return Err(ParamError::Unexpected {
                    id: case.id,
                    names: unexpected,
                });
            }

            let Case { id, mut fields } = case;
            let values = names
                .iter()
                .filter_map(|name| fields.remove(name))
                .collect();
            Ok(Params {
                id,
                names: Arc::clone(&names),
                values,
            })
        })
        .collect()
}

fn sorted<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut names: Vec<String> = names.cloned().collect();
    names.sort();
    names.dedup();
    names
}
