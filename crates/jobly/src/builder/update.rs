use crate::error::{JoblyError, JoblyResult};
use crate::value::SqlValue;
use std::fmt::Write;

/// An ordered set of field updates for a partial UPDATE.
///
/// Iteration order is insertion order, and placeholder positions in the
/// generated clause follow it exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    fields: Vec<(String, SqlValue)>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field update.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Append a field update when `value` is present (None => skip).
    pub fn set_opt<T>(&mut self, field: &str, value: Option<T>) -> &mut Self
    where
        T: Into<SqlValue>,
    {
        if let Some(v) = value {
            self.set(field, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(f, v)| (f.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for UpdateSet
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Logical field name -> storage column name.
///
/// Fields with no entry are assumed to already match their column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> ColumnMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    /// A map with no translations.
    pub const fn identity() -> Self {
        Self { entries: &[] }
    }

    /// Resolve the column for `field`.
    pub fn column<'f>(&self, field: &'f str) -> &'f str
    where
        'a: 'f,
    {
        self.entries
            .iter()
            .find(|(logical, _)| *logical == field)
            .map_or(field, |&(_, physical)| physical)
    }
}

/// Output of [`build_set_clause`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    /// `"col_a"=$1, "col_b"=$2, ...`
    pub clause: String,
    /// Values for `$1..$n`, in order.
    pub values: Vec<SqlValue>,
}

impl SetClause {
    /// Index of the first placeholder after the SET values, for the
    /// statement's own parameters (usually the row key in `WHERE`).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build the assignment list for a partial UPDATE.
///
/// Returns [`JoblyError::BadRequest`] when `updates` is empty.
///
/// # Example
/// ```ignore
/// let mut updates = UpdateSet::new();
/// updates.set("firstName", "Aliya").set("age", 32);
///
/// let set = build_set_clause(&updates, &ColumnMap::new(&[("firstName", "first_name")]))?;
/// assert_eq!(set.clause, r#""first_name"=$1, "age"=$2"#);
/// ```
pub fn build_set_clause(updates: &UpdateSet, column_map: &ColumnMap<'_>) -> JoblyResult<SetClause> {
    if updates.is_empty() {
        return Err(JoblyError::bad_request("No data"));
    }

    let mut clause = String::new();
    let mut values = Vec::with_capacity(updates.len());

    for (idx, (field, value)) in updates.iter().enumerate() {
        if idx > 0 {
            clause.push_str(", ");
        }
        let _ = write!(clause, "\"{}\"=${}", column_map.column(field), idx + 1);
        values.push(value.clone());
    }

    Ok(SetClause { clause, values })
}
