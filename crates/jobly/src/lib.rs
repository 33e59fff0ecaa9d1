//! # jobly
//!
//! PostgreSQL data layer for a jobs board: users, companies, jobs and
//! applications.
//!
//! ## Features
//!
//! - **SQL explicit**: every statement is hand-written; only the dynamic
//!   `SET` and `WHERE` fragments are generated
//! - **Partial updates**: [`build_set_clause`] turns a sparse [`UpdateSet`]
//!   into `"col"=$1, ...` plus ordered bind values
//! - **Filtered listings**: [`build_filter_clause`] turns optional
//!   range/substring/flag criteria into a parameterized predicate
//! - **Transaction-friendly**: models accept any [`GenericClient`]
//! - **Classified errors**: [`JoblyError::kind`] maps to 400/404/401/500
//!
//! ## Example
//!
//! ```ignore
//! use jobly::models::company::{self, CompanyPatch};
//!
//! let client = jobly::connect(&config.database_url).await?;
//!
//! let patch = CompanyPatch {
//!     num_employees: Some(Some(42)),
//!     ..Default::default()
//! };
//! let updated = company::update(&client, "c1", &patch).await?;
//! // UPDATE companies SET "num_employees"=$1 WHERE handle = $2 ...
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod pool;
pub mod query;
pub mod row;
pub mod value;

#[cfg(feature = "migrate")]
pub mod migrate;

pub use builder::{
    ColumnMap, FilterClause, FilterColumns, FilterCriteria, RangeWidth, SetClause, UpdateSet,
    WhereBuilder, build_filter_clause, build_set_clause,
};
pub use client::GenericClient;
pub use config::{Environment, JoblyConfig};
pub use error::{ErrorKind, JoblyError, JoblyResult};
pub use pool::connect;
pub use query::{Query, query};
pub use row::{FromRow, RowExt};
pub use value::SqlValue;

#[cfg(feature = "pool")]
pub use client::PoolClient;
#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
