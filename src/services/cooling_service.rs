//! Cooling service - CRUD over cooling records and the thermal endpoints.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CoolingData, CoolingDraft, CoolingRecord};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Which records an operation may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoolingScope {
    All,
    OwnedBy(Uuid),
}

impl CoolingScope {
    fn owner(self) -> Option<Uuid> {
        match self {
            CoolingScope::All => None,
            CoolingScope::OwnedBy(id) => Some(id),
        }
    }
}

/// Writable fields of a record as sent by clients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoolingInput {
    pub name: Option<String>,
    pub data: CoolingData,
    /// Explicit owner; `None` keeps the current one (or the caller on create)
    pub owner: Option<Uuid>,
}

#[async_trait]
pub trait CoolingService: Send + Sync {
    async fn list(
        &self,
        scope: CoolingScope,
        params: PaginationParams,
    ) -> AppResult<Paginated<CoolingRecord>>;

    async fn get(&self, scope: CoolingScope, id: i64) -> AppResult<CoolingRecord>;

    async fn create(&self, caller: Uuid, input: CoolingInput) -> AppResult<CoolingRecord>;

    /// Full replace: fields left out of `input` become null
    async fn replace(
        &self,
        scope: CoolingScope,
        id: i64,
        input: CoolingInput,
    ) -> AppResult<CoolingRecord>;

    async fn delete(&self, scope: CoolingScope, id: i64) -> AppResult<()>;
}

/// Concrete implementation of CoolingService using Unit of Work.
pub struct CoolingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CoolingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_owner_exists(&self, owner: Uuid) -> AppResult<()> {
        if self.uow.users().find_by_id(owner).await?.is_none() {
            return Err(AppError::validation(format!(
                "Invalid owner \"{}\" - object does not exist.",
                owner
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CoolingService for CoolingManager<U> {
    async fn list(
        &self,
        scope: CoolingScope,
        params: PaginationParams,
    ) -> AppResult<Paginated<CoolingRecord>> {
        let page = params.page.max(1);
        let per_page = params.limit();
        let (records, total) = self.uow.coolings().list(scope.owner(), params).await?;

        Ok(Paginated::new(records, page, per_page, total))
    }

    async fn get(&self, scope: CoolingScope, id: i64) -> AppResult<CoolingRecord> {
        self.uow
            .coolings()
            .find(id, scope.owner())
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, caller: Uuid, input: CoolingInput) -> AppResult<CoolingRecord> {
        let owner_id = match input.owner {
            Some(owner) if owner != caller => {
                self.ensure_owner_exists(owner).await?;
                owner
            }
            _ => caller,
        };

        let record = self
            .uow
            .coolings()
            .create(CoolingDraft {
                name: input.name,
                data: input.data,
                owner_id: Some(owner_id),
            })
            .await?;

        tracing::info!(cooling_id = record.cooling.id, owner_id = %owner_id, "Cooling record created");
        Ok(record)
    }

    async fn replace(
        &self,
        scope: CoolingScope,
        id: i64,
        input: CoolingInput,
    ) -> AppResult<CoolingRecord> {
        let existing = self.get(scope, id).await?;

        let owner_id = match input.owner {
            Some(owner) => {
                if existing.cooling.owner_id != Some(owner) {
                    self.ensure_owner_exists(owner).await?;
                }
                Some(owner)
            }
            None => existing.cooling.owner_id,
        };

        self.uow
            .coolings()
            .replace(
                id,
                CoolingDraft {
                    name: input.name,
                    data: input.data,
                    owner_id,
                },
            )
            .await
    }

    async fn delete(&self, scope: CoolingScope, id: i64) -> AppResult<()> {
        self.get(scope, id).await?;
        self.uow.coolings().delete(id).await?;
        tracing::info!(cooling_id = id, "Cooling record deleted");
        Ok(())
    }
}
