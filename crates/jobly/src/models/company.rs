//! Companies: CRUD plus filtered listing.

use crate::builder::{
    ColumnMap, FilterClause, FilterColumns, FilterCriteria, RangeWidth, UpdateSet,
    build_filter_clause, build_set_clause,
};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::models::job::JobSummary;
use crate::query::query;
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Logical patch field -> column.
pub const COLUMN_MAP: ColumnMap<'static> = ColumnMap::new(&[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

const FILTER_COLUMNS: FilterColumns<'static> = FilterColumns {
    range: Some("num_employees"),
    range_label: "employees",
    range_width: RangeWidth::Int4,
    text: Some("name"),
    flag: None,
};

// Default name of the UNIQUE constraint on `companies.name`.
const NAME_CONSTRAINT: &str = "companies_name_key";

fn duplicate_handle(handle: &str) -> String {
    format!("Duplicate company: {handle}")
}

fn duplicate_name(name: &str) -> String {
    format!("Duplicate company name: {name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
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

/// A company together with its jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Fields to change on a company. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<Option<i32>>,
    pub logo_url: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn to_update_set(&self) -> UpdateSet {
        let mut set = UpdateSet::new();
        set.set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("numEmployees", self.num_employees)
            .set_opt("logoUrl", self.logo_url.clone());
        set
    }
}

/// Listing filter for [`find_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
    /// Case-insensitive substring of the company name.
    pub name: Option<String>,
}

impl CompanyFilter {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min: self.min_employees,
            max: self.max_employees,
            substring: self.name.clone(),
            flag: None,
        }
    }
}

/// Create a company.
///
/// Returns `BadRequest` if the handle (or name) is already taken.
pub async fn create(conn: &impl GenericClient, data: &NewCompany) -> JoblyResult<Company> {
    let clash = query("SELECT handle FROM companies WHERE handle = $1 OR name = $2 LIMIT 1")
        .tag("companies.duplicate_check")
        .bind(data.handle.as_str())
        .bind(data.name.as_str())
        .fetch_opt(conn)
        .await?;
    if let Some(row) = clash {
        let handle: String = row.try_get_column("handle")?;
        return Err(JoblyError::bad_request(if handle == data.handle {
            duplicate_handle(&data.handle)
        } else {
            duplicate_name(&data.name)
        }));
    }

    let company: Company = query(
        "INSERT INTO companies (handle, name, description, num_employees, logo_url)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING handle, name, description, num_employees, logo_url",
    )
    .tag("companies.create")
    .bind(data.handle.as_str())
    .bind(data.name.as_str())
    .bind(data.description.as_str())
    .bind(data.num_employees)
    .bind(data.logo_url.clone())
    .fetch_one_as(conn)
    .await
    .map_err(|e| match e.constraint() {
        Some(NAME_CONSTRAINT) => e.unique_as_bad_request(duplicate_name(&data.name)),
        _ => e.unique_as_bad_request(duplicate_handle(&data.handle)),
    })?;

    tracing::info!(target: "jobly.models", handle = %company.handle, "company created");
    Ok(company)
}

/// List companies ordered by name, optionally filtered.
///
/// Returns `BadRequest` if `min_employees > max_employees`.
pub async fn find_all(
    conn: &impl GenericClient,
    filter: Option<&CompanyFilter>,
) -> JoblyResult<Vec<Company>> {
    let filter = match filter {
        Some(f) => build_filter_clause(&f.criteria(), &FILTER_COLUMNS)?,
        None => FilterClause::default(),
    };

    query(format!(
        "SELECT handle, name, description, num_employees, logo_url
         FROM companies{}
         ORDER BY name",
        filter.where_sql()
    ))
    .tag("companies.find_all")
    .bind_all(filter.values)
    .fetch_all_as(conn)
    .await
}

/// Fetch a company with its jobs.
pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
    let company: Company = query(
        "SELECT handle, name, description, num_employees, logo_url
         FROM companies
         WHERE handle = $1",
    )
    .tag("companies.get")
    .bind(handle)
    .fetch_opt_as(conn)
    .await?
    .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

    let jobs = query(
        "SELECT id, title, salary, equity
         FROM jobs
         WHERE company_handle = $1
         ORDER BY id",
    )
    .tag("companies.get_jobs")
    .bind(handle)
    .fetch_all_as(conn)
    .await?;

    Ok(CompanyDetail { company, jobs })
}

/// Apply a partial update.
///
/// Returns `BadRequest` for an empty patch and `NotFound` for an unknown handle.
pub async fn update(
    conn: &impl GenericClient,
    handle: &str,
    patch: &CompanyPatch,
) -> JoblyResult<Company> {
    let set = build_set_clause(&patch.to_update_set(), &COLUMN_MAP)?;
    let sql = format!(
        "UPDATE companies
         SET {}
         WHERE handle = ${}
         RETURNING handle, name, description, num_employees, logo_url",
        set.clause,
        set.next_placeholder()
    );

    let company: Company = query(sql)
        .tag("companies.update")
        .bind_all(set.values)
        .bind(handle)
        .fetch_opt_as(conn)
        .await
        .map_err(|e| {
            let name = patch.name.as_deref().unwrap_or_default();
            e.unique_as_bad_request(duplicate_name(name))
        })?
        .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

    tracing::info!(target: "jobly.models", handle, "company updated");
    Ok(company)
}

/// Delete a company (and, by cascade, its jobs).
pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
    let deleted = query("DELETE FROM companies WHERE handle = $1")
        .tag("companies.remove")
        .bind(handle)
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(JoblyError::not_found(format!("No company: {handle}")));
    }

    tracing::info!(target: "jobly.models", handle, "company removed");
    Ok(())
}
