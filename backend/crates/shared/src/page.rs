//! Pagination primitives
//!
//! 1-based page numbers with a bounded page size.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not send `limit`
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on `limit` to keep queries cheap
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested page (normalized)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Normalize raw query values: page >= 1, 1 <= limit <= MAX_PAGE_SIZE
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        Self { page, limit }
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for `OFFSET`
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Build the response metadata for a total row count
    pub fn pagination(&self, total: i64) -> Pagination {
        let total = total.max(0);
        let limit = self.limit as i64;
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination block returned next to every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

/// One page of items plus its metadata
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let req = PageRequest::new(Some(0), Some(10_000));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), MAX_PAGE_SIZE);

        let req = PageRequest::new(Some(3), Some(0));
        assert_eq!(req.limit(), 1);
        assert_eq!(req.offset(), 2);
    }

    #[test]
    fn test_pages_rounds_up() {
        let req = PageRequest::new(Some(2), Some(20));
        let p = req.pagination(41);
        assert_eq!(p.pages, 3);
        assert_eq!(p.page, 2);
        assert_eq!(req.pagination(0).pages, 0);
        assert_eq!(req.pagination(40).pages, 2);
    }
}
