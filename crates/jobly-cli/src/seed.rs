use crate::cli::SeedArgs;
use crate::resolve_config;
use anyhow::Context;
use jobly::models::company::{self, NewCompany};
use jobly::models::job::{self, NewJob};
use jobly::models::user::{self, NewUser};
use rust_decimal::Decimal;

const DEMO_PASSWORD: &str = "password";

struct DemoCompany {
    handle: &'static str,
    name: &'static str,
    num_employees: i32,
    description: &'static str,
    jobs: &'static [(&'static str, i32, Option<(i64, u32)>)],
}

// Equity is (mantissa, scale): (5, 2) is 0.05.
const COMPANIES: &[DemoCompany] = &[
    DemoCompany {
        handle: "anderson-arias",
        name: "Anderson, Arias and Morrow",
        num_employees: 245,
        description: "Somebody program how I. Face give away discussion view act inside.",
        jobs: &[
            ("Backend Engineer", 135_000, Some((5, 2))),
            ("Data Analyst", 98_000, None),
        ],
    },
    DemoCompany {
        handle: "baker-santos",
        name: "Baker-Santos",
        num_employees: 225,
        description: "Compare certain use. Writer time lay word garden.",
        jobs: &[("Site Reliability Engineer", 150_000, Some((1, 1)))],
    },
    DemoCompany {
        handle: "bauer-gallagher",
        name: "Bauer-Gallagher",
        num_employees: 862,
        description: "Difficult ready trip question produce produce someone.",
        jobs: &[
            ("Accountant", 72_000, Some((0, 0))),
            ("Product Designer", 110_000, None),
        ],
    },
];

const USERS: &[(&str, &str, &str, bool)] = &[
    ("admin", "Ada", "Admin", true),
    ("testuser", "Test", "User", false),
];

pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.conn)?;
    let mut client = jobly::connect(&config.database_url)
        .await
        .context("failed to connect")?;

    if args.migrate {
        jobly::migrate::run(&mut client).await?;
    }

    let tx = client.transaction().await?;

    let mut jobs = 0usize;
    for demo in COMPANIES {
        company::create(
            &tx,
            &NewCompany {
                handle: demo.handle.to_string(),
                name: demo.name.to_string(),
                description: demo.description.to_string(),
                num_employees: Some(demo.num_employees),
                logo_url: None,
            },
        )
        .await
        .with_context(|| format!("failed to create company {}", demo.handle))?;

        for &(title, salary, equity) in demo.jobs {
            job::create(
                &tx,
                &NewJob {
                    title: title.to_string(),
                    salary: Some(salary),
                    equity: equity.map(|(m, s)| Decimal::new(m, s)),
                    company_handle: demo.handle.to_string(),
                },
            )
            .await?;
            jobs += 1;
        }
    }

    for &(username, first_name, last_name, is_admin) in USERS {
        user::register(
            &tx,
            &NewUser {
                username: username.to_string(),
                password: DEMO_PASSWORD.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: format!("{username}@jobly.test"),
                is_admin,
            },
            config.bcrypt_cost,
        )
        .await
        .with_context(|| format!("failed to register {username}"))?;
    }

    tx.commit().await?;

    tracing::info!(
        companies = COMPANIES.len(),
        jobs,
        users = USERS.len(),
        "seeded demo data"
    );
    println!(
        "seeded {} companies, {} jobs, {} users (password: {DEMO_PASSWORD})",
        COMPANIES.len(),
        jobs,
        USERS.len()
    );
    Ok(())
}
