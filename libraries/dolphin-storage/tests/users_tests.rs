//! Integration tests for the users vertical slice


use dolphin_core::types::*;
use dolphin_core::CrmError;
use test_helpers::*;

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        firstname: "Pam".to_string(),
        lastname: "Beesly".to_string(),
        email: email.to_string(),
        password_hash: "$2b$04$placeholder".to_string(),
        role: Role::Member,
    }
}

#[tokio::test]
async fn test_create_and_get_user() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let id = dolphin_storage::users::create(pool, new_user("pam@example.com"))
        .await
        .unwrap();
    assert!(id > 0);

    let user = dolphin_storage::users::get_by_id(pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "pam@example.com");
    assert_eq!(user.full_name(), "Pam Beesly");
    assert_eq!(user.role, Role::Member);

    assert!(dolphin_storage::users::exists(pool, id).await.unwrap());
    assert!(!dolphin_storage::users::exists(pool, id + 100).await.unwrap());
    assert!(dolphin_storage::users::get_by_id(pool, id + 100)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    dolphin_storage::users::create(pool, new_user("dup@example.com"))
        .await
        .unwrap();

    let result = dolphin_storage::users::create(pool, new_user("dup@example.com")).await;
    assert!(matches!(result, Err(CrmError::DuplicateEmail)));
    assert_eq!(dolphin_storage::users::count(pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_names_escaped_on_write() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let mut user = new_user("xss@example.com");
    user.firstname = "<b>Bob</b>".to_string();
    user.lastname = "O'Neil".to_string();

    let id = dolphin_storage::users::create(pool, user).await.unwrap();
    let stored = dolphin_storage::users::get_by_id(pool, id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.firstname, "&lt;b&gt;Bob&lt;/b&gt;");
    assert_eq!(stored.lastname, "O&#039;Neil");
}

#[tokio::test]
async fn test_get_all_newest_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let first = create_test_user(pool, "First", "first@example.com", Role::Member).await;
    let second = create_test_user(pool, "Second", "second@example.com", Role::Administrator).await;

    let users = dolphin_storage::users::get_all(pool).await.unwrap();
    let ids: Vec<UserId> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(users[0].role, Role::Administrator);
}

#[tokio::test]
async fn test_find_credentials_exact_email() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let id = dolphin_storage::users::create(pool, new_user("creds@example.com"))
        .await
        .unwrap();

    let creds = dolphin_storage::users::find_credentials(pool, "creds@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(creds.user.id, id);
    assert_eq!(creds.password_hash, "$2b$04$placeholder");

    assert!(dolphin_storage::users::find_credentials(pool, "nobody@example.com")
        .await
        .unwrap()
        .is_none());
}
