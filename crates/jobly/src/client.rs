//! The connection seam every model operation is written against.

use crate::error::{JoblyError, JoblyResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Anything that can run a parameterized statement.
///
/// Model operations accept `&impl GenericClient`, so the same code runs on a
/// direct connection, a pooled connection, or inside a transaction.
pub trait GenericClient: Send + Sync {
    /// Run a statement and collect every row.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = JoblyResult<Vec<Row>>> + Send;

    /// First row of the result; `JoblyError::NotFound` when there is none.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = JoblyResult<Row>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| JoblyError::not_found("Expected one row, got none"))
        }
    }

    /// First row of the result, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = JoblyResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Run a statement and report how many rows it touched.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = JoblyResult<u64>> + Send;

    /// Run `;`-separated statements that take no parameters (DDL, `SET`).
    fn batch_execute(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = JoblyResult<()>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(JoblyError::from_db_error)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(JoblyError::from_db_error)
    }

    async fn batch_execute(&self, sql: &str) -> JoblyResult<()> {
        tokio_postgres::Client::batch_execute(self, sql)
            .await
            .map_err(JoblyError::from_db_error)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(JoblyError::from_db_error)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(JoblyError::from_db_error)
    }

    async fn batch_execute(&self, sql: &str) -> JoblyResult<()> {
        tokio_postgres::Transaction::batch_execute(self, sql)
            .await
            .map_err(JoblyError::from_db_error)
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        GenericClient::query(&***self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        GenericClient::execute(&***self, sql, params).await
    }

    async fn batch_execute(&self, sql: &str) -> JoblyResult<()> {
        GenericClient::batch_execute(&***self, sql).await
    }
}

/// Pooled connection handle.
#[cfg(feature = "pool")]
pub type PoolClient = deadpool_postgres::Client;
