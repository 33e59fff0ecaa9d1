//! Predicate accumulator shared by the filter builder.

use crate::value::SqlValue;

/// Collects `AND`-joined predicates and their bind values.
///
/// Placeholders are numbered as predicates are added, so `$i` always
/// matches the i-th collected value.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    predicates: Vec<String>,
    values: Vec<SqlValue>,
    last_placeholder: usize,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the predicates without a `WHERE` keyword.
    pub fn clause(&self) -> String {
        self.predicates.join(" AND ")
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.clause(), self.values)
    }

    fn push_bound(&mut self, column: &str, op: &str, value: SqlValue) -> &mut Self {
        self.last_placeholder += 1;
        self.predicates
            .push(format!("{column} {op} ${}", self.last_placeholder));
        self.values.push(value);
        self
    }

    /// `column >= $n`
    pub fn and_gte(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.push_bound(column, ">=", value.into())
    }

    /// `column <= $n`
    pub fn and_lte(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.push_bound(column, "<=", value.into())
    }

    /// `column ILIKE $n`; the caller supplies any `%` wildcards.
    pub fn and_ilike(&mut self, column: &str, pattern: impl Into<SqlValue>) -> &mut Self {
        self.push_bound(column, "ILIKE", pattern.into())
    }

    /// Append a predicate that binds nothing. `sql` is spliced verbatim and
    /// must not contain caller input.
    pub fn and_raw(&mut self, sql: &str) -> &mut Self {
        self.predicates.push(sql.to_string());
        self
    }
}
