//! Lightweight query runner for hand-written SQL

use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::row::FromRow;
use crate::value::SqlValue;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Hand-written SQL with `$1, $2, ...` placeholders and its bind values.
///
/// # Example
///
/// ```ignore
/// use jobly::query;
///
/// let company: Company = query("SELECT * FROM companies WHERE handle = $1")
///     .tag("companies.get")
///     .bind("c1")
///     .fetch_one_as(&conn)
///     .await?;
/// ```
#[must_use]
pub struct Query {
    sql: String,
    params: Vec<SqlValue>,
    tag: &'static str,
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query {
        sql: sql.into(),
        params: Vec::new(),
        tag: "-",
    }
}

impl Query {
    /// Label the statement in SQL debug logs.
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Bind the next parameter
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Bind several parameters in order
    pub fn bind_all(mut self, values: impl IntoIterator<Item = SqlValue>) -> Self {
        self.params.extend(values);
        self
    }

    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    fn trace(&self) {
        tracing::debug!(
            target: "jobly.sql",
            tag = self.tag,
            params = self.params.len(),
            sql = %self.sql,
            "executing statement"
        );
    }

    /// Execute the query and return all rows
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> JoblyResult<Vec<Row>> {
        self.trace();
        conn.query(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return all rows mapped to type T
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and return exactly one row
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> JoblyResult<Row> {
        self.trace();
        conn.query_one(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return exactly one row mapped to type T
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute the query and return at most one row
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> JoblyResult<Option<Row>> {
        self.trace();
        conn.query_opt(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return at most one row mapped to type T
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> JoblyResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the query and return the number of affected rows
    pub async fn execute(&self, conn: &impl GenericClient) -> JoblyResult<u64> {
        self.trace();
        conn.execute(&self.sql, &self.params_ref()).await
    }
}
