//! Client profile workflow tests over in-memory storage.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::json;

use common::{seed_user, MemoryUow, RecordingMailer};
use share_registry::domain::{
    HoldingKey, HoldingPayload, ProfilePayload, ReviewStatus, User, UserRole,
};
use share_registry::errors::AppError;
use share_registry::services::{ProfileManager, ProfileService, Provisioner};
use share_registry::types::PaginationParams;

struct Fixture {
    uow: Arc<MemoryUow>,
    mailer: Arc<RecordingMailer>,
    service: ProfileManager<MemoryUow>,
    admin: User,
}

fn fixture() -> Fixture {
    let uow = Arc::new(MemoryUow::default());
    let mailer = Arc::new(RecordingMailer::default());
    let admin = seed_user(&uow, "admin", UserRole::Admin, "adminpass");
    let service = ProfileManager::new(
        uow.clone(),
        Arc::new(Provisioner::new(uow.clone())),
        mailer.clone(),
    );
    Fixture {
        uow,
        mailer,
        service,
        admin,
    }
}

fn payload(value: serde_json::Value) -> ProfilePayload {
    serde_json::from_value(value).unwrap()
}

fn asha() -> ProfilePayload {
    payload(json!({
        "shareholderName": {"name1": "Asha Rao"},
        "panNumber": "abcde1234f",
        "email": "Asha@Example.com",
        "companies": [
            {"companyName": "Acme Ltd", "isinNumber": "INE000A01011", "quantity": 100, "faceValue": 10}
        ]
    }))
}

#[tokio::test]
async fn test_create_provisions_client_login() {
    let f = fixture();

    let created = f.service.create(&f.admin, asha()).await.unwrap();

    let credentials = created.credentials.expect("credentials for a new login");
    let suffix = credentials.username.strip_prefix("asharao").unwrap();
    assert_eq!(suffix.len(), 4);
    assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(credentials.password.chars().count(), 12);
    assert_eq!(credentials.email, "asha@example.com");

    let profile = created.profile;
    assert_eq!(profile.pan_number, "ABCDE1234F");
    assert_eq!(profile.companies[0].total_value, 1000.0);
    assert_eq!(
        profile.companies[0].holding.review.status,
        ReviewStatus::Pending
    );

    let login = f
        .uow
        .users
        .all()
        .into_iter()
        .find(|u| u.username == credentials.username)
        .unwrap();
    assert_eq!(login.role, UserRole::Client);
    assert_eq!(login.client_id, Some(profile.id));
    assert_eq!(profile.user_id, Some(login.id));

    let sent = f.mailer.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@example.com");
    assert!(sent[0].html.contains(&credentials.username));
}

#[tokio::test]
async fn test_existing_email_reuses_login() {
    let f = fixture();
    let first = f.service.create(&f.admin, asha()).await.unwrap();

    let second = f.service.create(&f.admin, asha()).await.unwrap();

    assert!(second.credentials.is_none());
    assert_eq!(second.profile.user_id, first.profile.user_id);

    // The reused login keeps access to the profile it already owned
    let login = f
        .uow
        .users
        .all()
        .into_iter()
        .find(|u| Some(u.id) == first.profile.user_id)
        .unwrap();
    assert_eq!(login.client_id, Some(first.profile.id));
}

#[tokio::test]
async fn test_reused_login_without_profile_gets_linked() {
    let f = fixture();
    let existing = seed_user(&f.uow, "asha", UserRole::Client, "ashapass");

    let created = f
        .service
        .create(
            &f.admin,
            payload(json!({
                "shareholderName": {"name1": "Asha Rao"},
                "panNumber": "ABCDE1234F",
                "email": "asha@example.com"
            })),
        )
        .await
        .unwrap();

    assert!(created.credentials.is_none());
    assert_eq!(created.profile.user_id, Some(existing.id));
    let login = f.uow.users.all().into_iter().find(|u| u.id == existing.id).unwrap();
    assert_eq!(login.client_id, Some(created.profile.id));
}

#[tokio::test]
async fn test_missing_email_uses_placeholder_and_sends_nothing() {
    let f = fixture();
    let created = f
        .service
        .create(
            &f.admin,
            payload(json!({
                "shareholderName": {"name1": "Ravi Kumar"},
                "panNumber": "PQRST6789Z"
            })),
        )
        .await
        .unwrap();

    let credentials = created.credentials.unwrap();
    assert!(credentials.email.ends_with("@clients.invalid"));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(f.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_only_admins_create() {
    let f = fixture();
    let employee = seed_user(&f.uow, "emp", UserRole::Employee, "emppass1");

    let err = f.service.create(&employee, asha()).await.unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
    assert_eq!(f.uow.users.all().len(), 2);
}

#[tokio::test]
async fn test_missing_required_fields_are_rejected() {
    let f = fixture();

    let err = f
        .service
        .create(&f.admin, payload(json!({"panNumber": "ABCDE1234F"})))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(f.uow.profiles.all().is_empty());
}

#[tokio::test]
async fn test_failed_insert_removes_new_login() {
    let f = fixture();
    f.uow.profiles.fail_insert.store(true, Ordering::SeqCst);

    assert!(f.service.create(&f.admin, asha()).await.is_err());

    assert_eq!(f.uow.users.all().len(), 1);
}

#[tokio::test]
async fn test_failed_link_removes_profile_and_login() {
    let f = fixture();
    f.uow.users.fail_link.store(true, Ordering::SeqCst);

    assert!(f.service.create(&f.admin, asha()).await.is_err());

    assert!(f.uow.profiles.all().is_empty());
    assert_eq!(f.uow.users.all().len(), 1);
}

#[tokio::test]
async fn test_search_by_pan_and_company() {
    let f = fixture();
    f.service.create(&f.admin, asha()).await.unwrap();
    f.service
        .create(
            &f.admin,
            payload(json!({
                "shareholderName": {"name1": "Ravi Kumar"},
                "panNumber": "PQRST6789Z",
                "companies": [{"companyName": "Globex Corp", "isinNumber": "INE999B01022"}]
            })),
        )
        .await
        .unwrap();

    let by_pan = f
        .service
        .list(&f.admin, Some("abcde".into()), PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(by_pan.total, 1);
    assert_eq!(by_pan.data[0].shareholder_name.name1, "Asha Rao");

    let by_company = f
        .service
        .list(&f.admin, Some("globex".into()), PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(by_company.total, 1);
    assert_eq!(by_company.data[0].pan_number, "PQRST6789Z");

    let everything = f
        .service
        .list(&f.admin, None, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(everything.total, 2);
}

#[tokio::test]
async fn test_employee_sees_only_assigned_profiles() {
    let f = fixture();
    let created = f.service.create(&f.admin, asha()).await.unwrap();
    let mut employee = seed_user(&f.uow, "emp", UserRole::Employee, "emppass1");

    let err = f
        .service
        .get(&employee, created.profile.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let listed = f
        .service
        .list(&employee, None, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 0);

    employee.assigned_clients.push(created.profile.id);
    let profile = f.service.get(&employee, created.profile.id).await.unwrap();
    assert_eq!(profile.id, created.profile.id);
}

#[tokio::test]
async fn test_client_reaches_only_own_profile() {
    let f = fixture();
    let own = f.service.create(&f.admin, asha()).await.unwrap();
    let other = f
        .service
        .create(
            &f.admin,
            payload(json!({"shareholderName": {"name1": "Ravi"}, "panNumber": "PQRST6789Z"})),
        )
        .await
        .unwrap();
    let client = f
        .uow
        .users
        .all()
        .into_iter()
        .find(|u| u.client_id == Some(own.profile.id))
        .unwrap();

    assert!(f.service.get(&client, own.profile.id).await.is_ok());
    let err = f.service.get(&client, other.profile.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_holding_lifecycle_and_review() {
    let f = fixture();
    let id = f.service.create(&f.admin, asha()).await.unwrap().profile.id;
    let globex = HoldingPayload {
        company_name: "Globex Corp".into(),
        isin_number: "INE999B01022".into(),
        quantity: 5,
        face_value: 2.0,
        ..Default::default()
    };

    let profile = f
        .service
        .add_holding(&f.admin, id, globex.clone())
        .await
        .unwrap();
    assert_eq!(profile.companies.len(), 2);

    let err = f
        .service
        .add_holding(&f.admin, id, globex)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let key = HoldingKey::new("Globex Corp", "INE999B01022");
    let profile = f
        .service
        .set_review(
            &f.admin,
            id,
            key.clone(),
            ReviewStatus::NeedsAttention,
            Some("folio mismatch".into()),
        )
        .await
        .unwrap();
    let review = &profile.companies[1].holding.review;
    assert_eq!(review.status, ReviewStatus::NeedsAttention);
    assert_eq!(review.notes, "folio mismatch");
    assert_eq!(review.reviewed_by.as_deref(), Some("admin"));
    assert!(review.reviewed_at.is_some());

    let profile = f
        .service
        .set_review(&f.admin, id, key.clone(), ReviewStatus::Pending, None)
        .await
        .unwrap();
    assert_eq!(profile.companies[1].holding.review.status, ReviewStatus::Pending);

    let profile = f
        .service
        .remove_holding(&f.admin, id, key.clone())
        .await
        .unwrap();
    assert_eq!(profile.companies.len(), 1);

    let err = f
        .service
        .set_review(&f.admin, id, key, ReviewStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_update_is_last_writer_wins() {
    let f = fixture();
    let id = f.service.create(&f.admin, asha()).await.unwrap().profile.id;

    let mut first = asha();
    first.remarks = Some("first".into());
    let mut second = asha();
    second.remarks = Some("second".into());

    f.service.update(&f.admin, id, first).await.unwrap();
    f.service.update(&f.admin, id, second).await.unwrap();

    let profile = f.service.get(&f.admin, id).await.unwrap();
    assert_eq!(profile.remarks.as_deref(), Some("second"));
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let f = fixture();
    let id = f.service.create(&f.admin, asha()).await.unwrap().profile.id;

    f.service.delete(&f.admin, id).await.unwrap();
    let err = f.service.delete(&f.admin, id).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound));
    // the login survives its profile
    assert_eq!(f.uow.users.all().len(), 2);
}
