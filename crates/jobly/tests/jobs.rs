mod common;

use common::{TestDb, seed};
use jobly::JoblyResult;
use jobly::models::job::{self, JobFilter, JobPatch, NewJob};
use rust_decimal::Decimal;

#[tokio::test]
async fn create_requires_company() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("create_requires_company").await? else {
        return Ok(());
    };
    seed(&db.client).await?;

    let created = job::create(
        &db.client,
        &NewJob {
            title: "Test".into(),
            salary: Some(100),
            equity: Some(Decimal::new(1, 1)),
            company_handle: "c2".into(),
        },
    )
    .await?;
    assert_eq!(created.title, "Test");
    assert_eq!(created.equity, Some(Decimal::new(1, 1)));
    assert_eq!(created.company_handle, "c2");

    let err = job::create(
        &db.client,
        &NewJob {
            title: "Orphan".into(),
            salary: None,
            equity: None,
            company_handle: "nope".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "Bad request: No company: nope");

    db.teardown().await
}

#[tokio::test]
async fn find_all_with_filters() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("jobs_find_all_with_filters").await? else {
        return Ok(());
    };
    seed(&db.client).await?;

    let all = job::find_all(&db.client, None).await?;
    let titles: Vec<_> = all.iter().map(|j| j.job.title.as_str()).collect();
    assert_eq!(titles, ["J1", "J2", "J3", "J4"]);
    assert_eq!(all[0].company_name.as_deref(), Some("C1"));

    let filter = JobFilter {
        min_salary: Some(2),
        ..Default::default()
    };
    let titles: Vec<_> = job::find_all(&db.client, Some(&filter))
        .await?
        .into_iter()
        .map(|j| j.job.title)
        .collect();
    assert_eq!(titles, ["J2", "J3"]);

    // Zero equity does not count as having equity.
    let filter = JobFilter {
        has_equity: Some(true),
        ..Default::default()
    };
    let titles: Vec<_> = job::find_all(&db.client, Some(&filter))
        .await?
        .into_iter()
        .map(|j| j.job.title)
        .collect();
    assert_eq!(titles, ["J1", "J2"]);

    let filter = JobFilter {
        has_equity: Some(false),
        ..Default::default()
    };
    assert_eq!(job::find_all(&db.client, Some(&filter)).await?.len(), 4);

    let filter = JobFilter {
        min_salary: Some(2),
        has_equity: Some(true),
        title: Some("j".into()),
    };
    let found = job::find_all(&db.client, Some(&filter)).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].job.title, "J2");

    db.teardown().await
}

#[tokio::test]
async fn get_includes_company() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("get_includes_company").await? else {
        return Ok(());
    };
    let seeded = seed(&db.client).await?;

    let detail = job::get(&db.client, seeded.job_ids[0]).await?;
    assert_eq!(detail.title, "J1");
    assert_eq!(detail.salary, Some(1));
    assert_eq!(detail.company.handle, "c1");
    assert_eq!(detail.company.num_employees, Some(1));

    let err = job::get(&db.client, 0).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found: No job: 0");

    db.teardown().await
}

#[tokio::test]
async fn update_and_remove() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("jobs_update_and_remove").await? else {
        return Ok(());
    };
    let seeded = seed(&db.client).await?;
    let id = seeded.job_ids[0];

    let patch = JobPatch {
        title: Some("New".into()),
        salary: Some(Some(500)),
        equity: Some(None),
    };
    let updated = job::update(&db.client, id, &patch).await?;
    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "New");
    assert_eq!(updated.salary, Some(500));
    assert_eq!(updated.equity, None);
    assert_eq!(updated.company_handle, "c1");

    let err = job::update(&db.client, id, &JobPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    let patch = JobPatch {
        title: Some("Ghost".into()),
        ..Default::default()
    };
    assert!(job::update(&db.client, 0, &patch).await.unwrap_err().is_not_found());

    // Equity above 1.0 violates the table check.
    let patch = JobPatch {
        equity: Some(Some(Decimal::new(15, 1))),
        ..Default::default()
    };
    let err = job::update(&db.client, id, &patch).await.unwrap_err();
    assert_eq!(err.kind(), jobly::ErrorKind::BadRequest);

    job::remove(&db.client, id).await?;
    assert!(job::get(&db.client, id).await.unwrap_err().is_not_found());
    assert!(job::remove(&db.client, id).await.unwrap_err().is_not_found());

    db.teardown().await
}

#[tokio::test]
async fn out_of_range_salary_bound_is_a_bad_request() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("out_of_range_salary_bound_is_a_bad_request").await? else {
        return Ok(());
    };
    seed(&db.client).await?;

    let filter = JobFilter {
        min_salary: Some(i64::from(i32::MAX) + 1),
        ..Default::default()
    };
    let err = job::find_all(&db.client, Some(&filter)).await.unwrap_err();
    assert!(err.is_bad_request());

    let filter = JobFilter {
        min_salary: Some(i64::from(i32::MAX)),
        ..Default::default()
    };
    assert!(job::find_all(&db.client, Some(&filter)).await?.is_empty());

    db.teardown().await
}
