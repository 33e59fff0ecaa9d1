use super::where_builder::WhereBuilder;
use crate::error::{JoblyError, JoblyResult};
use crate::value::SqlValue;

/// Optional filter criteria for a listing query.
///
/// Absent criteria impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Lower bound (inclusive) on the range column.
    pub min: Option<i64>,
    /// Upper bound (inclusive) on the range column.
    pub max: Option<i64>,
    /// Case-insensitive substring match on the text column.
    pub substring: Option<String>,
    /// When `true`, require the flag column to be greater than zero.
    pub flag: Option<bool>,
}

/// Integer width of a range column, which bounds `min`/`max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWidth {
    /// `integer`
    Int4,
    /// `bigint`
    Int8,
}

impl RangeWidth {
    fn contains(self, value: i64) -> bool {
        match self {
            Self::Int4 => i32::try_from(value).is_ok(),
            Self::Int8 => true,
        }
    }
}

/// Which columns the criteria apply to for one listing query.
#[derive(Debug, Clone, Copy)]
pub struct FilterColumns<'a> {
    /// Numeric column compared against `min`/`max`.
    pub range: Option<&'a str>,
    /// Human name of the range, used in error messages ("employees").
    pub range_label: &'a str,
    pub range_width: RangeWidth,
    /// Text column matched against `substring`.
    pub text: Option<&'a str>,
    /// Numeric column tested by `flag`.
    pub flag: Option<&'a str>,
}

/// Output of [`build_filter_clause`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterClause {
    /// Predicates joined with `AND`; empty when nothing was filtered.
    pub clause: String,
    /// Values for `$1..$n`, in order.
    pub values: Vec<SqlValue>,
}

impl FilterClause {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// ` WHERE <clause>`, or an empty string for an unfiltered query.
    pub fn where_sql(&self) -> String {
        if self.clause.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause)
        }
    }
}

fn require<'a>(column: Option<&'a str>, criterion: &str) -> JoblyResult<&'a str> {
    column.ok_or_else(|| JoblyError::bad_request(format!("Unsupported filter: {criterion}")))
}

/// Build the WHERE predicate for a filtered listing.
///
/// Predicates are emitted in a fixed order: `min`, `max`, `substring`,
/// `flag`. A `true` flag becomes `<flag> > 0` with no placeholder; a `false`
/// flag contributes nothing.
///
/// Returns [`JoblyError::BadRequest`] when a bound does not fit the range
/// column, when `min > max`, or when a criterion is given that `columns`
/// has no column for.
pub fn build_filter_clause(
    criteria: &FilterCriteria,
    columns: &FilterColumns<'_>,
) -> JoblyResult<FilterClause> {
    for (which, bound) in [("Min", criteria.min), ("Max", criteria.max)] {
        if let Some(v) = bound {
            if !columns.range_width.contains(v) {
                return Err(JoblyError::bad_request(format!(
                    "{which} {} out of range: {v}",
                    columns.range_label
                )));
            }
        }
    }

    if let (Some(min), Some(max)) = (criteria.min, criteria.max) {
        if min > max {
            return Err(JoblyError::bad_request(format!(
                "Min {label} cannot be greater than max {label}",
                label = columns.range_label
            )));
        }
    }

    let mut wb = WhereBuilder::new();

    if let Some(min) = criteria.min {
        wb.and_gte(require(columns.range, "min")?, min);
    }
    if let Some(max) = criteria.max {
        wb.and_lte(require(columns.range, "max")?, max);
    }
    if let Some(substring) = &criteria.substring {
        wb.and_ilike(
            require(columns.text, "substring")?,
            format!("%{substring}%"),
        );
    }
    if let Some(flag) = criteria.flag {
        let col = require(columns.flag, "flag")?;
        // The flag column is numeric, so "present" means strictly positive.
        if flag {
            wb.and_raw(&format!("{col} > 0"));
        }
    }

    let (clause, values) = wb.into_parts();
    Ok(FilterClause { clause, values })
}
