//! Shared fixtures for the service tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use cooling_api::domain::{Cooling, CoolingData, CoolingDraft, CoolingRecord, Password, User};
use cooling_api::infra::{
    CoolingRepository, MockCoolingRepository, MockTokenBlacklistRepository, MockUserRepository,
    TokenBlacklistRepository, UnitOfWork, UserRepository,
};

pub const PASSWORD: &str = "Thermal-Flow-42";

/// Unit of work over mockall repositories
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    coolings: Arc<MockCoolingRepository>,
    blacklist: Arc<MockTokenBlacklistRepository>,
}

impl TestUnitOfWork {
    pub fn new(
        users: MockUserRepository,
        coolings: MockCoolingRepository,
        blacklist: MockTokenBlacklistRepository,
    ) -> Arc<Self> {
        Arc::new(Self {
            users: Arc::new(users),
            coolings: Arc::new(coolings),
            blacklist: Arc::new(blacklist),
        })
    }

    pub fn with_users(users: MockUserRepository) -> Arc<Self> {
        Self::new(
            users,
            MockCoolingRepository::new(),
            MockTokenBlacklistRepository::new(),
        )
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn coolings(&self) -> Arc<dyn CoolingRepository> {
        self.coolings.clone()
    }

    fn blacklist(&self) -> Arc<dyn TokenBlacklistRepository> {
        self.blacklist.clone()
    }
}

pub fn user(email: &str) -> User {
    let password_hash = Password::for_user(PASSWORD, email)
        .map(Password::into_string)
        .unwrap_or_else(|e| panic!("test password rejected: {}", e));

    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        is_staff: false,
        is_superuser: false,
        is_active: true,
        date_joined: Utc::now(),
        last_login: None,
    }
}

pub fn staff(email: &str) -> User {
    User {
        is_staff: true,
        ..user(email)
    }
}

pub fn record(id: i64, draft: CoolingDraft, owner: Option<User>) -> CoolingRecord {
    CoolingRecord {
        cooling: Cooling {
            id,
            name: draft.name,
            data: draft.data,
            owner_id: draft.owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        owner,
    }
}

pub fn owned_record(id: i64, owner: &User) -> CoolingRecord {
    record(
        id,
        CoolingDraft {
            name: Some(format!("config {}", id)),
            data: CoolingData::default(),
            owner_id: Some(owner.id),
        },
        Some(owner.clone()),
    )
}
