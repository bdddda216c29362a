//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::lenient;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// Page and limit from the query string.
///
/// Missing, zero or unparsable values fall back to the defaults. The
/// limit is capped at the maximum page size and the page at
/// `MAX_PAGE_NUMBER`.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    #[serde(default, deserialize_with = "lenient::optional_count")]
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (max 100)
    #[serde(default, deserialize_with = "lenient::optional_count")]
    #[param(example = 20)]
    pub limit: Option<u64>,
}

impl PaginationParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE_NUMBER)
            .min(MAX_PAGE_NUMBER)
    }

    pub fn limit(&self) -> u64 {
        self.limit_or(DEFAULT_PAGE_SIZE)
    }

    /// Limit with a resource-specific default.
    pub fn limit_or(&self, default: u64) -> u64 {
        self.limit
            .filter(|l| *l >= 1)
            .unwrap_or(default)
            .min(MAX_PAGE_SIZE)
    }

    /// Rows to skip for the default limit.
    pub fn offset(&self) -> u64 {
        self.offset_for(self.limit())
    }

    /// Rows to skip when pages hold `limit` items.
    pub fn offset_for(&self, limit: u64) -> u64 {
        (self.page() - 1).saturating_mul(limit)
    }
}

/// Paginated response wrapper: `{data, page, limit, total}`
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PaginatedProfiles = Paginated<crate::domain::ProfileResponse>,
    PaginatedDmatAccounts = Paginated<crate::domain::DmatAccount>
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub limit: u64,
    /// Matches before pagination
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            data,
            page,
            limit,
            total,
        }
    }

    /// Convert the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let p = PaginationParams::default();
        assert_eq!((p.page(), p.limit(), p.offset()), (1, 20, 0));

        let p = PaginationParams::new(3, 500);
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 200);

        let p = PaginationParams::new(0, 0);
        assert_eq!((p.page(), p.limit()), (1, 20));
        assert_eq!(PaginationParams::default().limit_or(10), 10);
    }

    #[test]
    fn test_huge_page_is_capped() {
        let p = PaginationParams::new(u64::MAX / 2, 100);
        assert_eq!(p.page(), MAX_PAGE_NUMBER);
        assert_eq!(p.offset(), (MAX_PAGE_NUMBER - 1) * 100);
        assert!(p.offset() < i64::MAX as u64);

        let p: PaginationParams =
            serde_json::from_str(r#"{"page": "18446744073709551615"}"#).unwrap();
        assert_eq!(p.page(), MAX_PAGE_NUMBER);
        assert_eq!(p.offset_for(10), (MAX_PAGE_NUMBER - 1) * 10);
    }

    #[test]
    fn test_query_string_is_lenient() {
        let p: PaginationParams = serde_json::from_str(r#"{"page": "2", "limit": "abc"}"#).unwrap();
        assert_eq!(p.page(), 2);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_map_keeps_meta() {
        let page = Paginated::new(vec![1, 2], 2, 2, 7).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!((page.page, page.limit, page.total), (2, 2, 7));
    }
}
