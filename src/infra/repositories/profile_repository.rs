//! Client profile repository.
//!
//! Profiles are stored one row per aggregate with the embedded documents
//! in JSONB columns, so every save rewrites the whole aggregate.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::entities::client_profile::{self, ActiveModel, Entity as ProfileEntity};
use crate::domain::{ClientProfile, ProfileScope};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Free-text search matches the primary name, the PAN or any holding's
/// company name.
const SEARCH_SQL: &str = "(shareholder_name->>'name1' ILIKE $1 \
     OR pan_number ILIKE $2 \
     OR EXISTS (SELECT 1 FROM jsonb_array_elements(companies) AS c \
                WHERE c->>'companyName' ILIKE $3))";

/// Listing criteria.
#[derive(Debug, Clone)]
pub struct ProfileFilter {
    pub query: Option<String>,
    pub scope: ProfileScope,
    pub pagination: PaginationParams,
}

impl ProfileFilter {
    /// Trimmed, non-empty search text
    pub fn search_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// One page of matching profiles, newest first, plus the match count.
    async fn list(&self, filter: &ProfileFilter) -> AppResult<(Vec<ClientProfile>, u64)>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClientProfile>>;

    async fn insert(&self, profile: &ClientProfile) -> AppResult<ClientProfile>;

    /// Overwrite the stored aggregate. No version check is made.
    async fn save(&self, profile: &ClientProfile) -> AppResult<ClientProfile>;

    /// `NotFound` when no row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards so user text matches literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Scoped, searched, newest-first query. `None` when the scope admits no
/// profile at all.
fn list_query(filter: &ProfileFilter) -> Option<Select<ProfileEntity>> {
    let mut select = ProfileEntity::find();

    if let ProfileScope::Only(ids) = &filter.scope {
        if ids.is_empty() {
            return None;
        }
        select = select.filter(client_profile::Column::Id.is_in(ids.clone()));
    }

    if let Some(text) = filter.search_text() {
        let pattern = like_pattern(text);
        select = select.filter(Expr::cust_with_values(
            SEARCH_SQL,
            [pattern.clone(), pattern.clone(), pattern],
        ));
    }

    Some(select.order_by_desc(client_profile::Column::CreatedAt))
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn list(&self, filter: &ProfileFilter) -> AppResult<(Vec<ClientProfile>, u64)> {
        let Some(select) = list_query(filter) else {
            return Ok((Vec::new(), 0));
        };

        let total = select.clone().count(&self.db).await?;
        let models = select
            .offset(filter.pagination.offset())
            .limit(filter.pagination.limit())
            .all(&self.db)
            .await?;

        let profiles = models
            .into_iter()
            .map(ClientProfile::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((profiles, total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClientProfile>> {
        ProfileEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(ClientProfile::try_from)
            .transpose()
    }

    async fn insert(&self, profile: &ClientProfile) -> AppResult<ClientProfile> {
        let model = ActiveModel::from_domain(profile)?
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Client profile"))?;
        ClientProfile::try_from(model)
    }

    async fn save(&self, profile: &ClientProfile) -> AppResult<ClientProfile> {
        let model = ActiveModel::from_domain(profile)?
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AppError::NotFound,
                other => AppError::from_write(other, "Client profile"),
            })?;
        ClientProfile::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProfileEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait, Statement, Value};

    fn filter(query: Option<&str>, scope: ProfileScope) -> ProfileFilter {
        ProfileFilter {
            query: query.map(str::to_string),
            scope,
            pagination: PaginationParams::default(),
        }
    }

    fn postgres(filter: &ProfileFilter) -> Statement {
        list_query(filter)
            .expect("scope admits profiles")
            .build(DbBackend::Postgres)
    }

    fn bound(stmt: &Statement) -> Vec<Value> {
        stmt.values.clone().map(|v| v.0).unwrap_or_default()
    }

    #[test]
    fn test_search_covers_name_pan_and_company_names() {
        let stmt = postgres(&filter(Some("  cde12 "), ProfileScope::All));

        assert!(stmt.sql.contains("shareholder_name->>'name1' ILIKE $1"));
        assert!(stmt.sql.contains("pan_number ILIKE $2"));
        assert!(stmt.sql.contains("jsonb_array_elements(companies)"));
        assert!(stmt.sql.contains("c->>'companyName' ILIKE $3"));
        assert!(stmt
            .sql
            .ends_with(r#"ORDER BY "client_profiles"."created_at" DESC"#));
        assert_eq!(bound(&stmt), vec![Value::from("%cde12%"); 3]);
    }

    #[test]
    fn test_scope_is_applied_before_search() {
        let id = Uuid::new_v4();
        let stmt = postgres(&filter(Some("acme"), ProfileScope::Only(vec![id])));

        assert!(stmt.sql.contains(r#""client_profiles"."id" IN ($1)"#));
        assert!(stmt.sql.contains("ILIKE $2"));
        assert!(stmt.sql.contains("ILIKE $4"));
        let values = bound(&stmt);
        assert_eq!(values[0], Value::from(id));
        assert_eq!(values[1..], vec![Value::from("%acme%"); 3]);
    }

    #[test]
    fn test_unscoped_listing_has_no_filter() {
        let stmt = postgres(&filter(None, ProfileScope::All));
        assert!(!stmt.sql.contains("WHERE"));
        assert!(bound(&stmt).is_empty());
    }

    #[test]
    fn test_empty_scope_skips_the_query() {
        assert!(list_query(&filter(Some("acme"), ProfileScope::Only(Vec::new()))).is_none());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let filter = ProfileFilter {
            query: Some("   ".into()),
            scope: ProfileScope::All,
            pagination: PaginationParams::default(),
        };
        assert_eq!(filter.search_text(), None);
    }
}
