//! Cooling record repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::cooling::{self, blobs_to_json, ActiveModel, Entity as CoolingEntity};
use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{Cooling, CoolingDraft, CoolingRecord, User};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cooling repository trait for dependency injection.
///
/// `owner` narrows a query to one user's records; `None` means all records.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CoolingRepository: Send + Sync {
    /// One page of records (newest first) plus the total matching count
    async fn list(
        &self,
        owner: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<(Vec<CoolingRecord>, u64)>;

    async fn find(&self, id: i64, owner: Option<Uuid>) -> AppResult<Option<CoolingRecord>>;

    async fn create(&self, draft: CoolingDraft) -> AppResult<CoolingRecord>;

    /// Overwrite every writable column
    async fn replace(&self, id: i64, draft: CoolingDraft) -> AppResult<CoolingRecord>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of CoolingRepository
pub struct CoolingStore {
    db: DatabaseConnection,
}

impl CoolingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn scoped(owner: Option<Uuid>) -> Select<CoolingEntity> {
        match owner {
            Some(owner_id) => CoolingEntity::find().filter(cooling::Column::OwnerId.eq(owner_id)),
            None => CoolingEntity::find(),
        }
    }

    /// Pair each record with its owner, loading all owners in one query.
    async fn attach_owners(&self, models: Vec<cooling::Model>) -> AppResult<Vec<CoolingRecord>> {
        let mut owner_ids: Vec<Uuid> = models.iter().filter_map(|m| m.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<Uuid, User> = if owner_ids.is_empty() {
            HashMap::new()
        } else {
            UserEntity::find()
                .filter(user::Column::Id.is_in(owner_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, User::from(m)))
                .collect()
        };

        Ok(models
            .into_iter()
            .map(|model| {
                let owner = model.owner_id.and_then(|id| owners.get(&id).cloned());
                CoolingRecord {
                    cooling: Cooling::from(model),
                    owner,
                }
            })
            .collect())
    }

    async fn attach_owner(&self, model: cooling::Model) -> AppResult<CoolingRecord> {
        let owner = match model.owner_id {
            Some(id) => UserEntity::find_by_id(id).one(&self.db).await?.map(User::from),
            None => None,
        };

        Ok(CoolingRecord {
            cooling: Cooling::from(model),
            owner,
        })
    }
}

fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::validation("Invalid owner: user does not exist")
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl CoolingRepository for CoolingStore {
    async fn list(
        &self,
        owner: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<(Vec<CoolingRecord>, u64)> {
        let paginator = Self::scoped(owner)
            .order_by_desc(cooling::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page.saturating_sub(1)).await?;

        Ok((self.attach_owners(models).await?, total))
    }

    async fn find(&self, id: i64, owner: Option<Uuid>) -> AppResult<Option<CoolingRecord>> {
        let model = Self::scoped(owner)
            .filter(cooling::Column::Id.eq(id))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => Ok(Some(self.attach_owner(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, draft: CoolingDraft) -> AppResult<CoolingRecord> {
        let now = Utc::now();
        let data = draft.data;
        let active_model = ActiveModel {
            name: Set(draft.name),
            components: Set(blobs_to_json(data.components)),
            losses: Set(blobs_to_json(data.losses)),
            faces: Set(blobs_to_json(data.faces)),
            passages: Set(blobs_to_json(data.passages)),
            fluids: Set(blobs_to_json(data.fluids)),
            owner_id: Set(draft.owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        self.attach_owner(model).await
    }

    async fn replace(&self, id: i64, draft: CoolingDraft) -> AppResult<CoolingRecord> {
        let existing = CoolingEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let data = draft.data;
        let mut active: ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.components = Set(blobs_to_json(data.components));
        active.losses = Set(blobs_to_json(data.losses));
        active.faces = Set(blobs_to_json(data.faces));
        active.passages = Set(blobs_to_json(data.passages));
        active.fluids = Set(blobs_to_json(data.fluids));
        active.owner_id = Set(draft.owner_id);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        self.attach_owner(model).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = CoolingEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
