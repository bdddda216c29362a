//! Legacy shareholder records kept in the JSON file.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::config::DEFAULT_SHAREHOLDER_PAGE_SIZE;
use crate::domain::Shareholder;
use crate::errors::{AppError, AppResult};
use crate::infra::ShareholderRepository;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ShareholderService: Send + Sync {
    /// File order, ten per page unless asked otherwise.
    async fn list(&self, pagination: PaginationParams) -> AppResult<Paginated<Shareholder>>;

    async fn get(&self, id: Uuid) -> AppResult<Shareholder>;

    async fn create(&self, payload: Value) -> AppResult<Shareholder>;

    /// Shallow merge of `payload` into the stored record.
    async fn update(&self, id: Uuid, payload: Value) -> AppResult<Shareholder>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct ShareholderManager {
    store: Arc<dyn ShareholderRepository>,
}

impl ShareholderManager {
    pub fn new(store: Arc<dyn ShareholderRepository>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ShareholderService for ShareholderManager {
    async fn list(&self, pagination: PaginationParams) -> AppResult<Paginated<Shareholder>> {
        let all = self.store.list().await?;
        let page = pagination.page();
        let limit = pagination.limit_or(DEFAULT_SHAREHOLDER_PAGE_SIZE);
        let total = all.len() as u64;

        let data = all
            .into_iter()
            .skip(usize::try_from(pagination.offset_for(limit)).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect();
        Ok(Paginated::new(data, page, limit, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<Shareholder> {
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn create(&self, payload: Value) -> AppResult<Shareholder> {
        self.store.create(payload).await
    }

    async fn update(&self, id: Uuid, payload: Value) -> AppResult<Shareholder> {
        self.store.update(id, payload).await?.ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store
            .delete(id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}
