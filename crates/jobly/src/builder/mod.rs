//! Clause builders for hand-written SQL templates.
//!
//! Models keep their statements as plain SQL and only generate the dynamic
//! parts here:
//!
//! - [`build_set_clause`] turns a sparse [`UpdateSet`] into `"col"=$1, ...`
//!   for `UPDATE ... SET <clause> WHERE ...`.
//! - [`build_filter_clause`] turns optional [`FilterCriteria`] into
//!   `col >= $1 AND ...` for `SELECT ... WHERE <clause>`.
//!
//! Both are pure functions. Placeholders are numbered `$1..$n` in emission
//! order and the returned values line up with them one to one.

pub mod filter;
pub mod update;
pub mod where_builder;

pub use filter::{FilterClause, FilterColumns, FilterCriteria, RangeWidth, build_filter_clause};
pub use update::{ColumnMap, SetClause, UpdateSet, build_set_clause};
pub use where_builder::WhereBuilder;
