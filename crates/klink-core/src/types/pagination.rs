//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 100;
/// Maximum page size.
pub const MAX_LIMIT: u64 = 1000;
/// Highest page number accepted. Keeps every offset within `i64`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
}

impl PageRequest {
    /// Create a new page request, clamping both values into range.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Calculate the SQL `OFFSET` value. Saturates instead of overflowing.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// A neighbouring page reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

/// The `pagination` object returned with every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// Total number of matching items.
    pub total: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
    /// The following page, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    /// The preceding page, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    /// Compute page metadata for a request and a total count.
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(request.limit).max(1);
        let next = (request.offset().saturating_add(request.limit) < total).then_some(PageLink {
            page: request.page.saturating_add(1),
            limit: request.limit,
        });
        let prev = (request.page > 1).then_some(PageLink {
            page: request.page - 1,
            limit: request.limit,
        });
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            next,
            prev,
        }
    }
}
