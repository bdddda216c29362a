//! DMAT account use cases.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{CreateDmatAccount, DmatAccount, UpdateDmatAccount, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait DmatService: Send + Sync {
    async fn list(&self, pagination: PaginationParams) -> AppResult<Paginated<DmatAccount>>;

    async fn get(&self, id: Uuid) -> AppResult<DmatAccount>;

    /// Staff only. Duplicate account numbers are rejected.
    async fn create(&self, actor: &User, input: CreateDmatAccount) -> AppResult<DmatAccount>;

    /// Staff only
    async fn update(&self, actor: &User, id: Uuid, input: UpdateDmatAccount)
        -> AppResult<DmatAccount>;

    /// Staff only
    async fn delete(&self, actor: &User, id: Uuid) -> AppResult<()>;
}

fn require_staff(actor: &User) -> AppResult<()> {
    if actor.is_active && actor.role.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub struct DmatManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DmatManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DmatService for DmatManager<U> {
    async fn list(&self, pagination: PaginationParams) -> AppResult<Paginated<DmatAccount>> {
        let (accounts, total) = self.uow.dmat_accounts().list(&pagination).await?;
        Ok(Paginated::new(
            accounts,
            pagination.page(),
            pagination.limit(),
            total,
        ))
    }

    async fn get(&self, id: Uuid) -> AppResult<DmatAccount> {
        self.uow
            .dmat_accounts()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, actor: &User, input: CreateDmatAccount) -> AppResult<DmatAccount> {
        require_staff(actor)?;
        let (account_number, holder_name, expiry_date, renewal_status) = input.normalized()?;

        let now = Utc::now();
        let account = DmatAccount {
            id: Uuid::new_v4(),
            account_number,
            holder_name,
            expiry_date,
            renewal_status,
            created_at: now,
            updated_at: now,
        };

        let saved = self.uow.dmat_accounts().insert(&account).await?;
        tracing::info!(account_id = %saved.id, "dmat account created");
        Ok(saved)
    }

    async fn update(
        &self,
        actor: &User,
        id: Uuid,
        input: UpdateDmatAccount,
    ) -> AppResult<DmatAccount> {
        require_staff(actor)?;

        let repo = self.uow.dmat_accounts();
        let mut account = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        account.apply(input, Utc::now())?;
        repo.save(&account).await
    }

    async fn delete(&self, actor: &User, id: Uuid) -> AppResult<()> {
        require_staff(actor)?;
        self.uow.dmat_accounts().delete(id).await?;
        tracing::info!(account_id = %id, "dmat account deleted");
        Ok(())
    }
}
