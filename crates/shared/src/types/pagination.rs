//! Page windows for list endpoints.

use serde::Serialize;

/// A 1-based page window, always within bounds once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
}

impl PageRequest {
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT_PER_PAGE: u32 = 20;
    /// Largest page size a caller may request.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Builds a window from optional query values, clamping out-of-range ones.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Rows to fetch.
    #[must_use]
    pub fn limit(self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of rows plus enough to render a pager.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Page number, starting at 1.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
    /// Matching rows across all pages.
    pub total: u64,
    /// At least 1, even when nothing matched.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Wraps one fetched page.
    #[must_use]
    pub fn new(data: Vec<T>, window: PageRequest, total: u64) -> Self {
        Self {
            data,
            page: window.page,
            per_page: window.per_page,
            total,
            total_pages: total.div_ceil(u64::from(window.per_page)).max(1),
        }
    }

    /// An empty page for callers that can see nothing.
    #[must_use]
    pub fn empty(window: PageRequest) -> Self {
        Self::new(Vec::new(), window, 0)
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
