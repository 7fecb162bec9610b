//! Account service tests.

mod common;

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;

use common::{staff, user, TestUnitOfWork, PASSWORD};
use cooling_api::config::{Config, INVALID_RESET_TOKEN_MESSAGE};
use cooling_api::domain::{NewUser, Password, ResetTokenGenerator};
use cooling_api::errors::AppError;
use cooling_api::infra::MockUserRepository;
use cooling_api::jobs::{EmailJob, MockEmailQueue};
use cooling_api::services::{AccountManager, AccountService};

fn manager(users: MockUserRepository, emails: MockEmailQueue) -> AccountManager<TestUnitOfWork> {
    AccountManager::new(
        TestUnitOfWork::with_users(users),
        Arc::new(emails),
        Config::for_tests(),
    )
}

fn reset_tokens() -> ResetTokenGenerator {
    let config = Config::for_tests();
    ResetTokenGenerator::new(
        config.jwt_secret_bytes(),
        config.password_reset_timeout_seconds,
    )
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let existing = user("ada@example.com");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .with(eq("ada@example.com"))
        .returning(move |_| Ok(Some(existing.clone())));
    users.expect_create().never();

    let result = manager(users, MockEmailQueue::new())
        .register(NewUser {
            email: "ada@EXAMPLE.com".to_string(),
            password: PASSWORD.to_string(),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_register_weak_password_rejected() {
    let mut users = MockUserRepository::new();
    users.expect_create().never();

    let result = manager(users, MockEmailQueue::new())
        .register(NewUser {
            email: "ada@example.com".to_string(),
            password: "12345678".to_string(),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_create_superuser_sets_flags() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_create()
        .withf(|draft| draft.is_staff && draft.is_superuser)
        .times(1)
        .returning(|draft| {
            let mut created = staff(&draft.email);
            created.is_superuser = true;
            Ok(created)
        });

    let created = manager(users, MockEmailQueue::new())
        .create_superuser(NewUser {
            email: "root@example.com".to_string(),
            password: PASSWORD.to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(created.is_superuser);
}

#[tokio::test]
async fn test_list_visible_regular_user_sees_only_self() {
    let viewer = user("ada@example.com");
    let mut users = MockUserRepository::new();
    let found = viewer.clone();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    users.expect_list().never();

    let visible = manager(users, MockEmailQueue::new())
        .list_visible(viewer.id)
        .await
        .unwrap();

    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, viewer.id);
}

#[tokio::test]
async fn test_list_visible_staff_sees_everyone() {
    let viewer = staff("admin@example.com");
    let mut users = MockUserRepository::new();
    let found = viewer.clone();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let everyone = vec![viewer.clone(), user("a@example.com"), user("b@example.com")];
    users
        .expect_list()
        .times(1)
        .returning(move || Ok(everyone.clone()));

    let visible = manager(users, MockEmailQueue::new())
        .list_visible(viewer.id)
        .await
        .unwrap();

    assert_eq!(visible.len(), 3);
}

#[tokio::test]
async fn test_get_visible_other_account_forbidden() {
    let viewer = user("ada@example.com");
    let other = user("grace@example.com");
    let (viewer_id, other_id) = (viewer.id, other.id);

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(move |id| {
        Ok(if id == viewer.id {
            Some(viewer.clone())
        } else if id == other.id {
            Some(other.clone())
        } else {
            None
        })
    });

    let accounts = manager(users, MockEmailQueue::new());

    assert!(matches!(
        accounts.get_visible(viewer_id, other_id).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        accounts.get_visible(viewer_id, uuid::Uuid::new_v4()).await,
        Err(AppError::NotFound)
    ));
    assert_eq!(
        accounts.get_visible(viewer_id, viewer_id).await.unwrap().id,
        viewer_id
    );
}

#[tokio::test]
async fn test_delete_account_requires_password() {
    let account = user("ada@example.com");
    let id = account.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(account.clone())));
    users
        .expect_delete()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(()));

    let accounts = manager(users, MockEmailQueue::new());

    assert!(matches!(
        accounts.delete_account(id, "wrong").await,
        Err(AppError::Validation(_))
    ));
    accounts.delete_account(id, PASSWORD).await.unwrap();
}

#[tokio::test]
async fn test_set_password_stores_new_hash() {
    let account = user("ada@example.com");
    let id = account.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(account.clone())));
    users
        .expect_set_password_hash()
        .withf(move |user_id, hash| {
            *user_id == id && Password::from_hash(hash.clone()).verify("Cold-Plate-Loop-7")
        })
        .times(1)
        .returning(|_, _| Ok(()));

    manager(users, MockEmailQueue::new())
        .set_password(id, PASSWORD, "Cold-Plate-Loop-7")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_request_queues_email_for_active_account() {
    let account = user("ada@example.com");
    let mut users = MockUserRepository::new();
    let found = account.clone();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(found.clone())));

    let mut emails = MockEmailQueue::new();
    emails
        .expect_enqueue()
        .withf(|job: &EmailJob| {
            job.to == "ada@example.com" && job.body.contains("password/reset/confirm/")
        })
        .times(1)
        .returning(|_| Ok(()));

    manager(users, emails)
        .request_password_reset("ada@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_request_unknown_email_is_silent() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let mut emails = MockEmailQueue::new();
    emails.expect_enqueue().never();

    assert!(manager(users, emails)
        .request_password_reset("nobody@example.com")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_reset_request_hides_queue_failure() {
    let account = user("ada@example.com");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(account.clone())));

    let mut emails = MockEmailQueue::new();
    emails
        .expect_enqueue()
        .returning(|_| Err(AppError::internal("queue down")));

    assert!(manager(users, emails)
        .request_password_reset("ada@example.com")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_reset_confirm_with_valid_token() {
    let account = user("ada@example.com");
    let id = account.id;
    let token = reset_tokens().make_token(&account, Utc::now());

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(account.clone())));
    users
        .expect_set_password_hash()
        .withf(move |user_id, _| *user_id == id)
        .times(1)
        .returning(|_, _| Ok(()));

    manager(users, MockEmailQueue::new())
        .confirm_password_reset(&token, "Cold-Plate-Loop-7")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_confirm_token_invalid_after_password_change() {
    let account = user("ada@example.com");
    let token = reset_tokens().make_token(&account, Utc::now());

    let mut changed = account.clone();
    changed.password_hash = Password::for_user("Cold-Plate-Loop-7", &account.email)
        .unwrap()
        .into_string();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(changed.clone())));
    users.expect_set_password_hash().never();

    let result = manager(users, MockEmailQueue::new())
        .confirm_password_reset(&token, "Another-Pass-99")
        .await;

    match result {
        Err(AppError::Validation(message)) => assert_eq!(message, INVALID_RESET_TOKEN_MESSAGE),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reset_confirm_malformed_token() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();

    let result = manager(users, MockEmailQueue::new())
        .confirm_password_reset("garbage", "Cold-Plate-Loop-7")
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}
