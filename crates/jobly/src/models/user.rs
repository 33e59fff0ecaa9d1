//! Users: registration, authentication, CRUD and job applications.

use crate::builder::{ColumnMap, UpdateSet, build_set_clause};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::password::{hash_password, verify_password};
use crate::query::query;
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub const COLUMN_MAP: ColumnMap<'static> = ColumnMap::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

const INVALID_CREDENTIALS: &str = "Invalid username/password";

/// A user as returned to callers. The password hash never leaves the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

/// A user with the ids of the jobs they applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub applications: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Fields to change on a user. A new password is hashed before storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    /// Lower to an [`UpdateSet`]. `password` must already be hashed.
    pub fn to_update_set(&self) -> UpdateSet {
        let mut set = UpdateSet::new();
        set.set_opt("password", self.password.clone())
            .set_opt("firstName", self.first_name.clone())
            .set_opt("lastName", self.last_name.clone())
            .set_opt("email", self.email.clone())
            .set_opt("isAdmin", self.is_admin);
        set
    }
}

/// Check a username/password pair.
///
/// Unknown users and wrong passwords both fail with the same
/// `Unauthorized` error.
pub async fn authenticate(
    conn: &impl GenericClient,
    username: &str,
    password: &str,
) -> JoblyResult<User> {
    let row = query(format!(
        "SELECT {USER_COLUMNS}, password FROM users WHERE username = $1"
    ))
    .tag("users.authenticate")
    .bind(username)
    .fetch_opt(conn)
    .await?;

    if let Some(row) = row {
        let hash: String = row.try_get_column("password")?;
        if verify_password(password.to_string(), hash).await? {
            return User::from_row(&row);
        }
    }

    tracing::warn!(target: "jobly.models", username, "authentication failed");
    Err(JoblyError::unauthorized(INVALID_CREDENTIALS))
}

/// Register a new user, storing a bcrypt hash of the password.
pub async fn register(
    conn: &impl GenericClient,
    data: &NewUser,
    bcrypt_cost: u32,
) -> JoblyResult<User> {
    let duplicate = query("SELECT username FROM users WHERE username = $1")
        .tag("users.duplicate_check")
        .bind(data.username.as_str())
        .fetch_opt(conn)
        .await?;
    if duplicate.is_some() {
        return Err(JoblyError::bad_request(format!(
            "Duplicate username: {}",
            data.username
        )));
    }

    let hashed = hash_password(data.password.clone(), bcrypt_cost).await?;

    let user: User = query(format!(
        "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {USER_COLUMNS}"
    ))
    .tag("users.register")
    .bind(data.username.as_str())
    .bind(hashed)
    .bind(data.first_name.as_str())
    .bind(data.last_name.as_str())
    .bind(data.email.as_str())
    .bind(data.is_admin)
    .fetch_one_as(conn)
    .await
    .map_err(|e| e.unique_as_bad_request(format!("Duplicate username: {}", data.username)))?;

    tracing::info!(target: "jobly.models", username = %user.username, "user registered");
    Ok(user)
}

/// List all users ordered by username.
pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<User>> {
    query(format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))
        .tag("users.find_all")
        .fetch_all_as(conn)
        .await
}

pub async fn get(conn: &impl GenericClient, username: &str) -> JoblyResult<UserDetail> {
    let user: User = query(format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .tag("users.get")
    .bind(username)
    .fetch_opt_as(conn)
    .await?
    .ok_or_else(|| JoblyError::not_found(format!("No user: {username}")))?;

    let rows = query("SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id")
        .tag("users.get_applications")
        .bind(username)
        .fetch_all(conn)
        .await?;
    let applications = rows
        .iter()
        .map(|row| row.try_get_column::<i32>("job_id"))
        .collect::<JoblyResult<Vec<_>>>()?;

    Ok(UserDetail { user, applications })
}

/// Apply a partial update, re-hashing a supplied password first.
pub async fn update(
    conn: &impl GenericClient,
    username: &str,
    patch: &UserPatch,
    bcrypt_cost: u32,
) -> JoblyResult<User> {
    let mut patch = patch.clone();
    if let Some(password) = patch.password.take() {
        patch.password = Some(hash_password(password, bcrypt_cost).await?);
    }

    let set = build_set_clause(&patch.to_update_set(), &COLUMN_MAP)?;
    let sql = format!(
        "UPDATE users
         SET {}
         WHERE username = ${}
         RETURNING {USER_COLUMNS}",
        set.clause,
        set.next_placeholder()
    );

    let user: User = query(sql)
        .tag("users.update")
        .bind_all(set.values)
        .bind(username)
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No user: {username}")))?;

    tracing::info!(target: "jobly.models", username, "user updated");
    Ok(user)
}

pub async fn remove(conn: &impl GenericClient, username: &str) -> JoblyResult<()> {
    let deleted = query("DELETE FROM users WHERE username = $1")
        .tag("users.remove")
        .bind(username)
        .execute(conn)
        .await?;
    if deleted == 0 {
        return Err(JoblyError::not_found(format!("No user: {username}")));
    }

    tracing::info!(target: "jobly.models", username, "user removed");
    Ok(())
}

/// Record that `username` applied to job `job_id`.
///
/// The job is checked before the user; applying twice is a `BadRequest`.
pub async fn apply_to_job(
    conn: &impl GenericClient,
    username: &str,
    job_id: i32,
) -> JoblyResult<()> {
    query("SELECT id FROM jobs WHERE id = $1")
        .tag("users.apply.job_check")
        .bind(job_id)
        .fetch_opt(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No job: {job_id}")))?;

    query("SELECT username FROM users WHERE username = $1")
        .tag("users.apply.user_check")
        .bind(username)
        .fetch_opt(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found(format!("No username: {username}")))?;

    query("INSERT INTO applications (job_id, username) VALUES ($1, $2)")
        .tag("users.apply")
        .bind(job_id)
        .bind(username)
        .execute(conn)
        .await
        .map_err(|e| {
            e.unique_as_bad_request(format!("Already applied: {username} to job {job_id}"))
        })?;

    tracing::info!(target: "jobly.models", username, job_id, "application recorded");
    Ok(())
}
