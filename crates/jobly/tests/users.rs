mod common;

use common::{BCRYPT_COST, TestDb, seed};
use jobly::models::user::{self, NewUser, UserPatch};
use jobly::{ErrorKind, JoblyResult};

#[tokio::test]
async fn register_and_authenticate() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("register_and_authenticate").await? else {
        return Ok(());
    };
    seed(&db.client).await?;

    let new = NewUser {
        username: "new".into(),
        password: "password".into(),
        first_name: "Test".into(),
        last_name: "Tester".into(),
        email: "test@test.com".into(),
        is_admin: true,
    };
    let created = user::register(&db.client, &new, BCRYPT_COST).await?;
    assert_eq!(created.username, "new");
    assert!(created.is_admin);

    let row = db
        .client
        .query_one("SELECT password FROM users WHERE username = 'new'", &[])
        .await?;
    let stored: String = row.get("password");
    assert!(stored.starts_with("$2b$"));

    let err = user::register(&db.client, &new, BCRYPT_COST)
        .await
        .unwrap_err();
    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "Bad request: Duplicate username: new");

    let authed = user::authenticate(&db.client, "u1", "password1").await?;
    assert_eq!(authed.first_name, "U1F");

    let err = user::authenticate(&db.client, "u1", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.kind().status_code(), 401);

    let err = user::authenticate(&db.client, "nope", "password1")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    db.teardown().await
}

#[tokio::test]
async fn find_all_and_get() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("users_find_all_and_get").await? else {
        return Ok(());
    };
    let seeded = seed(&db.client).await?;

    let all = user::find_all(&db.client).await?;
    let names: Vec<_> = all.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["u1", "u2"]);

    user::apply_to_job(&db.client, "u1", seeded.job_ids[1]).await?;
    user::apply_to_job(&db.client, "u1", seeded.job_ids[0]).await?;

    let detail = user::get(&db.client, "u1").await?;
    assert_eq!(detail.user.email, "u1@email.com");
    assert_eq!(detail.applications, vec![seeded.job_ids[0], seeded.job_ids[1]]);

    assert!(user::get(&db.client, "u2").await?.applications.is_empty());
    assert!(user::get(&db.client, "nope").await.unwrap_err().is_not_found());

    db.teardown().await
}

#[tokio::test]
async fn update_rehashes_password() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("update_rehashes_password").await? else {
        return Ok(());
    };
    seed(&db.client).await?;

    let patch = UserPatch {
        first_name: Some("NewF".into()),
        is_admin: Some(true),
        ..Default::default()
    };
    let updated = user::update(&db.client, "u1", &patch, BCRYPT_COST).await?;
    assert_eq!(updated.first_name, "NewF");
    assert_eq!(updated.last_name, "U1L");
    assert!(updated.is_admin);

    let patch = UserPatch {
        password: Some("new-password".into()),
        ..Default::default()
    };
    user::update(&db.client, "u1", &patch, BCRYPT_COST).await?;
    user::authenticate(&db.client, "u1", "new-password").await?;
    assert!(
        user::authenticate(&db.client, "u1", "password1")
            .await
            .unwrap_err()
            .is_unauthorized()
    );

    let err = user::update(&db.client, "u1", &UserPatch::default(), BCRYPT_COST)
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    let patch = UserPatch {
        last_name: Some("X".into()),
        ..Default::default()
    };
    let err = user::update(&db.client, "nope", &patch, BCRYPT_COST)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    db.teardown().await
}

#[tokio::test]
async fn apply_to_job_checks_both_sides() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("apply_to_job_checks_both_sides").await? else {
        return Ok(());
    };
    let seeded = seed(&db.client).await?;
    let job_id = seeded.job_ids[0];

    user::apply_to_job(&db.client, "u2", job_id).await?;

    let err = user::apply_to_job(&db.client, "u2", job_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let err = user::apply_to_job(&db.client, "u2", 0).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: No job: 0");

    let err = user::apply_to_job(&db.client, "nope", job_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not found: No username: nope");

    db.teardown().await
}

#[tokio::test]
async fn remove_user() -> JoblyResult<()> {
    let Some(db) = TestDb::setup("remove_user").await? else {
        return Ok(());
    };
    let seeded = seed(&db.client).await?;
    user::apply_to_job(&db.client, "u1", seeded.job_ids[0]).await?;

    user::remove(&db.client, "u1").await?;
    assert!(user::get(&db.client, "u1").await.unwrap_err().is_not_found());
    assert!(user::remove(&db.client, "u1").await.unwrap_err().is_not_found());

    let row = db
        .client
        .query_one("SELECT count(*) AS n FROM applications", &[])
        .await?;
    assert_eq!(row.get::<_, i64>("n"), 0);

    db.teardown().await
}
