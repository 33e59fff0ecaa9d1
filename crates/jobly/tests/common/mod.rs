//! Shared fixtures for database-backed tests.
//!
//! Each test gets its own schema so tests can run in parallel against one
//! database. Tests skip when `DATABASE_URL` is not set.

#![allow(dead_code)]

use jobly::models::company::{self, NewCompany};
use jobly::models::job::{self, NewJob};
use jobly::models::user::{self, NewUser};
use jobly::{GenericClient, JoblyResult};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const BCRYPT_COST: u32 = 4;

static SCHEMA_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TestDb {
    pub client: tokio_postgres::Client,
    schema: String,
}

impl TestDb {
    /// Connect and create a fresh schema, or `None` if no database is configured.
    pub async fn setup(test_name: &str) -> JoblyResult<Option<Self>> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(v) => v,
            Err(_) => {
                eprintln!("DATABASE_URL is not set; skipping {test_name}");
                return Ok(None);
            }
        };

        let client = jobly::connect(&database_url).await?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX_EPOCH")
            .subsec_nanos();
        let schema = format!(
            "jobly_test_{}_{}_{}",
            std::process::id(),
            SCHEMA_COUNTER.fetch_add(1, Ordering::Relaxed),
            nanos
        );

        GenericClient::batch_execute(
            &client,
            &format!("CREATE SCHEMA {schema}; SET search_path TO {schema};"),
        )
        .await?;
        GenericClient::batch_execute(&client, jobly::migrate::SCHEMA_SQL).await?;

        Ok(Some(Self { client, schema }))
    }

    pub async fn teardown(self) -> JoblyResult<()> {
        GenericClient::batch_execute(
            &self.client,
            &format!("DROP SCHEMA {} CASCADE", self.schema),
        )
        .await
    }
}

/// Ids of the jobs created by [`seed`], in creation order.
pub struct Seeded {
    pub job_ids: Vec<i32>,
}

/// Three companies, four jobs under `c1`, two users.
///
/// | job | title | salary | equity |
/// |-----|-------|--------|--------|
/// | 0   | J1    | 1      | 0.1    |
/// | 1   | J2    | 2      | 0.2    |
/// | 2   | J3    | 3      | 0      |
/// | 3   | J4    | null   | null   |
pub async fn seed(conn: &impl GenericClient) -> JoblyResult<Seeded> {
    for n in 1..=3 {
        company::create(
            conn,
            &NewCompany {
                handle: format!("c{n}"),
                name: format!("C{n}"),
                description: format!("Desc{n}"),
                num_employees: Some(n),
                logo_url: Some(format!("http://c{n}.img")),
            },
        )
        .await?;
    }

    let jobs = [
        ("J1", Some(1), Some(Decimal::new(1, 1))),
        ("J2", Some(2), Some(Decimal::new(2, 1))),
        ("J3", Some(3), Some(Decimal::ZERO)),
        ("J4", None, None),
    ];
    let mut job_ids = Vec::with_capacity(jobs.len());
    for (title, salary, equity) in jobs {
        let created = job::create(
            conn,
            &NewJob {
                title: title.to_string(),
                salary,
                equity,
                company_handle: "c1".to_string(),
            },
        )
        .await?;
        job_ids.push(created.id);
    }

    for n in 1..=2 {
        user::register(
            conn,
            &NewUser {
                username: format!("u{n}"),
                password: format!("password{n}"),
                first_name: format!("U{n}F"),
                last_name: format!("U{n}L"),
                email: format!("u{n}@email.com"),
                is_admin: false,
            },
            BCRYPT_COST,
        )
        .await?;
    }

    Ok(Seeded { job_ids })
}
