//! Authentication service tests.

mod common;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use mockall::predicate::eq;

use common::{user, TestUnitOfWork, PASSWORD};
use cooling_api::config::Config;
use cooling_api::domain::{NewUser, User};
use cooling_api::errors::AppError;
use cooling_api::infra::{MockCoolingRepository, MockTokenBlacklistRepository, MockUserRepository};
use cooling_api::jobs::MockEmailQueue;
use cooling_api::services::{
    AccessClaims, AccountManager, AccountService, AuthService, Authenticator, JwtCodec,
    TokenClaims, TokenType,
};

fn authenticator(uow: Arc<TestUnitOfWork>) -> Authenticator<TestUnitOfWork> {
    Authenticator::new(uow, &Config::for_tests())
}

fn users_returning(stored: User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    let by_email = stored.clone();
    users
        .expect_find_by_email()
        .returning(move |email| Ok((email == by_email.email).then(|| by_email.clone())));
    let by_id = stored;
    users
        .expect_find_by_id()
        .returning(move |id| Ok((id == by_id.id).then(|| by_id.clone())));
    users.expect_record_login().returning(|_, _| Ok(()));
    users
}

#[tokio::test]
async fn test_register_then_login_yields_profile_claims() {
    let stored: Arc<Mutex<Option<User>>> = Arc::new(Mutex::new(None));

    let mut users = MockUserRepository::new();
    let lookup = stored.clone();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(lookup.lock().unwrap().clone()));
    let created = stored.clone();
    users.expect_create().times(1).returning(move |draft| {
        let mut user = user(&draft.email);
        user.password_hash = draft.password_hash;
        user.first_name = draft.first_name;
        user.last_name = draft.last_name;
        *created.lock().unwrap() = Some(user.clone());
        Ok(user)
    });
    users.expect_record_login().times(1).returning(|_, _| Ok(()));

    let uow = TestUnitOfWork::with_users(users);
    let accounts = AccountManager::new(
        uow.clone(),
        Arc::new(MockEmailQueue::new()),
        Config::for_tests(),
    );

    let registered = accounts
        .register(NewUser {
            email: "grace@Example.COM".to_string(),
            password: PASSWORD.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            is_staff: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!registered.is_staff);

    let pair = authenticator(uow)
        .obtain_pair("grace@example.com", PASSWORD)
        .await
        .unwrap();

    let codec = JwtCodec::new(&Config::for_tests());
    let claims: AccessClaims = codec.decode(&pair.access).unwrap();
    assert_eq!(claims.base.token_type, TokenType::Access);
    assert_eq!(claims.base.user_id, registered.id);
    assert_eq!(claims.email, "grace@example.com");
    assert_eq!(claims.first_name, "Grace");
    assert_eq!(claims.last_name, "Hopper");
    assert_eq!(claims.name, "Grace Hopper");
    assert!(!claims.is_staff);
    assert!(!claims.is_superuser);

    let refresh: TokenClaims = codec.decode(&pair.refresh).unwrap();
    assert_eq!(refresh.token_type, TokenType::Refresh);
    assert_eq!(refresh.user_id, registered.id);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let account = user("ada@example.com");
    let mut users = MockUserRepository::new();
    let found = account.clone();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(found.clone())));
    users.expect_record_login().never();

    let result = authenticator(TestUnitOfWork::with_users(users))
        .obtain_pair("ada@example.com", "not-the-password")
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let result = authenticator(TestUnitOfWork::with_users(users))
        .obtain_pair("nobody@example.com", PASSWORD)
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_inactive_account() {
    let mut account = user("ada@example.com");
    account.is_active = false;

    let result = authenticator(TestUnitOfWork::with_users(users_returning(account)))
        .obtain_pair("ada@example.com", PASSWORD)
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let account = user("ada@example.com");
    let mut blacklist = MockTokenBlacklistRepository::new();
    blacklist.expect_contains().returning(|_| Ok(false));

    let uow = TestUnitOfWork::new(
        users_returning(account.clone()),
        MockCoolingRepository::new(),
        blacklist,
    );
    let auth = authenticator(uow);

    let pair = auth.obtain_pair("ada@example.com", PASSWORD).await.unwrap();
    let refreshed = auth.refresh(&pair.refresh).await.unwrap();

    let claims = auth.verify_access(&refreshed.access).unwrap();
    assert_eq!(claims.base.user_id, account.id);
}

#[tokio::test]
async fn test_refresh_rejects_blacklisted_token() {
    let account = user("ada@example.com");
    let mut blacklist = MockTokenBlacklistRepository::new();
    blacklist.expect_contains().returning(|_| Ok(true));

    let uow = TestUnitOfWork::new(
        users_returning(account),
        MockCoolingRepository::new(),
        blacklist,
    );
    let auth = authenticator(uow);

    let pair = auth.obtain_pair("ada@example.com", PASSWORD).await.unwrap();
    assert!(matches!(
        auth.refresh(&pair.refresh).await,
        Err(AppError::InvalidToken)
    ));
    assert!(matches!(
        auth.verify(&pair.refresh).await,
        Err(AppError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let account = user("ada@example.com");
    let auth = authenticator(TestUnitOfWork::with_users(users_returning(account)));

    let pair = auth.obtain_pair("ada@example.com", PASSWORD).await.unwrap();
    assert!(auth.refresh(&pair.access).await.is_err());
}

#[tokio::test]
async fn test_blacklist_records_jti_until_expiry() {
    let account = user("ada@example.com");
    let config = Config::for_tests();
    let codec = JwtCodec::new(&config);
    let claims = codec.refresh_claims(&account, Utc::now());
    let token = codec.encode(&claims).unwrap();

    let mut blacklist = MockTokenBlacklistRepository::new();
    blacklist
        .expect_add()
        .with(eq(claims.jti), eq(account.id), eq(claims.expires_at().unwrap()))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let uow = TestUnitOfWork::new(
        MockUserRepository::new(),
        MockCoolingRepository::new(),
        blacklist,
    );

    authenticator(uow).blacklist(&token).await.unwrap();
}

#[tokio::test]
async fn test_blacklist_rejects_garbage() {
    let auth = authenticator(TestUnitOfWork::with_users(MockUserRepository::new()));
    assert!(auth.blacklist("not-a-jwt").await.is_err());
}

#[tokio::test]
async fn test_verify_accepts_access_token_without_lookup() {
    let account = user("ada@example.com");
    let codec = JwtCodec::new(&Config::for_tests());
    let token = codec
        .encode(&codec.access_claims(&account, Utc::now()))
        .unwrap();

    let mut blacklist = MockTokenBlacklistRepository::new();
    blacklist.expect_contains().never();
    let uow = TestUnitOfWork::new(
        MockUserRepository::new(),
        MockCoolingRepository::new(),
        blacklist,
    );

    assert!(authenticator(uow).verify(&token).await.is_ok());
}
