//! Offset pagination value objects

use serde::Serialize;

use crate::error::DomainError;

/// Default page size when the caller does not specify one
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Hard upper bound on page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validated page request (1-based page, clamped page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Create a page request
    ///
    /// `page` must be >= 1; `page_size` is clamped to `1..=max_page_size`.
    pub fn new(page: i64, page_size: i64, max_page_size: i64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidPage(page));
        }
        let cap = max_page_size.clamp(1, MAX_PAGE_SIZE);
        Ok(Self {
            page,
            page_size: page_size.clamp(1, cap),
        })
    }

    /// First page with the default size
    pub fn first() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[inline]
    pub const fn page(&self) -> i64 {
        self.page
    }

    #[inline]
    pub const fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Row offset for SQL OFFSET clauses
    #[inline]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Row limit for SQL LIMIT clauses
    #[inline]
    pub const fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results together with the total row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }

    /// Whether pages beyond this one exist
    #[inline]
    pub const fn has_more(&self) -> bool {
        self.page * self.page_size < self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map the items, preserving the pagination envelope
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        let req = PageRequest::new(1, 50, MAX_PAGE_SIZE).unwrap();
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 50);

        let req = PageRequest::new(3, 20, MAX_PAGE_SIZE).unwrap();
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn test_page_request_rejects_page_below_one() {
        assert!(matches!(
            PageRequest::new(0, 50, MAX_PAGE_SIZE),
            Err(DomainError::InvalidPage(0))
        ));
        assert!(matches!(
            PageRequest::new(-3, 50, MAX_PAGE_SIZE),
            Err(DomainError::InvalidPage(-3))
        ));
    }

    #[test]
    fn test_page_request_clamps_page_size() {
        let req = PageRequest::new(1, 500, 100).unwrap();
        assert_eq!(req.page_size(), 100);

        let req = PageRequest::new(1, 0, 100).unwrap();
        assert_eq!(req.page_size(), 1);

        // Configured cap may not exceed the hard bound
        let req = PageRequest::new(1, 5000, 10_000).unwrap();
        assert_eq!(req.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_has_more() {
        let req = PageRequest::new(1, 50, MAX_PAGE_SIZE).unwrap();
        let page = Page::new(vec![0; 50], 120, req);
        assert!(page.has_more());

        let req = PageRequest::new(3, 50, MAX_PAGE_SIZE).unwrap();
        let page = Page::new(vec![0; 20], 120, req);
        assert!(!page.has_more());
    }

    #[test]
    fn test_page_has_more_exact_boundary() {
        let req = PageRequest::new(2, 50, MAX_PAGE_SIZE).unwrap();
        let page = Page::new(vec![0; 50], 100, req);
        assert!(!page.has_more());
    }

    #[test]
    fn test_page_map_preserves_envelope() {
        let req = PageRequest::new(2, 10, MAX_PAGE_SIZE).unwrap();
        let page = Page::new(vec![1, 2, 3], 23, req);
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total, 23);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.page_size, 10);
    }
}
