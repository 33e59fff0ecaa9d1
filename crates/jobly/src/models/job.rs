//! Jobs: CRUD plus filtered listing joined with the owning company.

use crate::builder::{
    ColumnMap, FilterClause, FilterColumns, FilterCriteria, RangeWidth, UpdateSet,
    build_filter_clause, build_set_clause,
};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::query::query;
use crate::row::{FromRow, RowExt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Job patch fields already match their columns.
pub const COLUMN_MAP: ColumnMap<'static> = ColumnMap::identity();

// Qualified: the listing joins `companies`, which also has a `name`.
const FILTER_COLUMNS: FilterColumns<'static> = FilterColumns {
    range: Some("j.salary"),
    range_label: "salary",
    range_width: RangeWidth::Int4,
    text: Some("j.title"),
    flag: Some("j.equity"),
};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job as listed under its company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl FromRow for JobSummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

/// A job row in [`find_all`], carrying the company name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    #[serde(flatten)]
    pub job: Job,
    pub company_name: Option<String>,
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            job: Job::from_row(row)?,
            company_name: row.try_get_column("company_name")?,
        })
    }
}

/// The company a job belongs to, as embedded in [`JobDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for CompanySummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: CompanySummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Fields to change on a job. The id and company are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub salary: Option<Option<i32>>,
    pub equity: Option<Option<Decimal>>,
}

impl JobPatch {
    pub fn to_update_set(&self) -> UpdateSet {
        let mut set = UpdateSet::new();
        set.set_opt("title", self.title.clone())
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity);
        set
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub min_salary: Option<i64>,
    /// Only jobs with a non-zero equity stake.
    pub has_equity: Option<bool>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
}

impl JobFilter {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min: self.min_salary,
            max: None,
            substring: self.title.clone(),
            flag: self.has_equity,
        }
    }
}

/// Create a job under an existing company.
pub async fn create(conn: &impl GenericClient, data: &NewJob) -> JoblyResult<Job> {
    let job: Job = query(format!(
        "INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ($1, $2, $3, $4)
         RETURNING {JOB_COLUMNS}"
    ))
    .tag("jobs.create")
    .bind(data.title.as_str())
    .bind(data.salary)
    .bind(data.equity)
    .bind(data.company_handle.as_str())
    .fetch_one_as(conn)
    .await
    .map_err(|e| {
        e.foreign_key_as_bad_request(format!("No company: {}", data.company_handle))
    })?;

    tracing::info!(target: "jobly.models", id = job.id, company = %job.company_handle, "job created");
    Ok(job)
}

/// List jobs ordered by title, optionally filtered.
pub async fn find_all(
    conn: &impl GenericClient,
    filter: Option<&JobFilter>,
) -> JoblyResult<Vec<JobListing>> {
    let filter = match filter {
        Some(f) => build_filter_clause(&f.criteria(), &FILTER_COLUMNS)?,
        None => FilterClause::default(),
    };

    query(format!(
        "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name AS company_name
         FROM jobs j
         LEFT JOIN companies c ON c.handle = j.company_handle{}
         ORDER BY j.title, j.id",
        filter.where_sql()
    ))
    .tag("jobs.find_all")
    .bind_all(filter.values)
    .fetch_all_as(conn)
    .await
}

/// Fetch a job with its company.
pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<JobDetail> {
    let job: Job = query(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
        .tag("jobs.get")
        .bind(id)
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;

    let company: CompanySummary = query(
        "SELECT handle, name, description, num_employees, logo_url
         FROM companies
         WHERE handle = $1",
    )
    .tag("jobs.get_company")
    .bind(job.company_handle.as_str())
    .fetch_one_as(conn)
    .await?;

    Ok(JobDetail {
        id: job.id,
        title: job.title,
        salary: job.salary,
        equity: job.equity,
        company,
    })
}

/// Apply a partial update.
pub async fn update(conn: &impl GenericClient, id: i32, patch: &JobPatch) -> JoblyResult<Job> {
    let set = build_set_clause(&patch.to_update_set(), &COLUMN_MAP)?;
    let sql = format!(
        "UPDATE jobs
         SET {}
         WHERE id = ${}
         RETURNING {JOB_COLUMNS}",
        set.clause,
        set.next_placeholder()
    );

    let job: Job = query(sql)
        .tag("jobs.update")
        .bind_all(set.values)
        .bind(id)
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;

    tracing::info!(target: "jobly.models", id, "job updated");
    Ok(job)
}

pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
    let deleted = query("DELETE FROM jobs WHERE id = $1")
        .tag("jobs.remove")
        .bind(id)
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(JoblyError::not_found(format!("No job: {id}")));
    }

    tracing::info!(target: "jobly.models", id, "job removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    #[test]
    fn patch_can_clear_equity() {
        let patch = JobPatch {
            salary: Some(Some(500)),
            equity: Some(None),
            ..Default::default()
        };

        let set = build_set_clause(&patch.to_update_set(), &COLUMN_MAP).unwrap();

        assert_eq!(set.clause, r#""salary"=$1, "equity"=$2"#);
        assert_eq!(set.values, vec![SqlValue::Int(500), SqlValue::Null]);
        assert_eq!(set.next_placeholder(), 3);
    }

    #[test]
    fn filter_uses_qualified_columns() {
        let filter = JobFilter {
            min_salary: Some(100),
            has_equity: Some(true),
            title: Some("eng".into()),
        };

        let clause = build_filter_clause(&filter.criteria(), &FILTER_COLUMNS).unwrap();

        assert_eq!(
            clause.clause,
            "j.salary >= $1 AND j.title ILIKE $2 AND j.equity > 0"
        );
        assert_eq!(
            clause.values,
            vec![SqlValue::Int(100), SqlValue::Text("%eng%".into())]
        );
    }

    #[test]
    fn equity_flag_false_adds_nothing() {
        let filter = JobFilter {
            has_equity: Some(false),
            ..Default::default()
        };

        let clause = build_filter_clause(&filter.criteria(), &FILTER_COLUMNS).unwrap();

        assert!(clause.is_empty());
        assert_eq!(clause.where_sql(), "");
    }
}
