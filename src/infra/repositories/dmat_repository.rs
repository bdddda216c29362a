//! DMAT account repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::entities::dmat_account::{self, ActiveModel, Entity as DmatEntity};
use crate::domain::DmatAccount;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DmatRepository: Send + Sync {
    /// One page, newest first, plus the total count.
    async fn list(&self, pagination: &PaginationParams) -> AppResult<(Vec<DmatAccount>, u64)>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DmatAccount>>;

    /// Duplicate account numbers fail with `Conflict`.
    async fn insert(&self, account: &DmatAccount) -> AppResult<DmatAccount>;

    async fn save(&self, account: &DmatAccount) -> AppResult<DmatAccount>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct DmatStore {
    db: DatabaseConnection,
}

impl DmatStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DmatRepository for DmatStore {
    async fn list(&self, pagination: &PaginationParams) -> AppResult<(Vec<DmatAccount>, u64)> {
        let select = DmatEntity::find().order_by_desc(dmat_account::Column::CreatedAt);
        let total = select.clone().count(&self.db).await?;
        let models = select
            .offset(pagination.offset())
            .limit(pagination.limit())
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(DmatAccount::from).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DmatAccount>> {
        let result = DmatEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(DmatAccount::from))
    }

    async fn insert(&self, account: &DmatAccount) -> AppResult<DmatAccount> {
        let model = ActiveModel::from_domain(account)
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "DMAT account"))?;
        Ok(DmatAccount::from(model))
    }

    async fn save(&self, account: &DmatAccount) -> AppResult<DmatAccount> {
        let model = ActiveModel::from_domain(account)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AppError::NotFound,
                other => AppError::from_write(other, "DMAT account"),
            })?;
        Ok(DmatAccount::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = DmatEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
