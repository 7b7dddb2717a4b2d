//! Page-number pagination utilities.
//!
//! Pages are 1-based. A page past the end of the result set is not an
//! error, it simply holds no items.

use serde::{Deserialize, Serialize};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A requested page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Create a page request, clamping out-of-range values.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// First page with the given size.
    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    /// Same page size, different page.
    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.page_size)
    }

    /// Number of items that precede this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }
}

/// Computes `ceil(total / page_size)`; zero items means zero pages.
pub fn total_pages(total: usize, page_size: u32) -> u32 {
    let size = page_size.max(1) as usize;
    let pages = total.div_ceil(size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Returns the items that fall on the requested page.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(request.offset())
        .take(request.page_size as usize)
        .cloned()
        .collect()
}

/// Pagination info reported alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub page_size: u32,
    pub total: usize,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: usize) -> Self {
        Self {
            current_page: request.page,
            page_size: request.page_size,
            total,
            total_pages: total_pages(total, request.page_size),
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::new(PageRequest::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_request() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_new_clamps_values() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1);

        let request = PageRequest::new(3, 500);
        assert_eq!(request.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(1, 7).offset(), 0);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(23, 5), 5);
    }

    #[test]
    fn test_paginate_slices_requested_page() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(paginate(&items, PageRequest::new(1, 10)), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, PageRequest::new(3, 10)), vec![21, 22, 23]);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let items: Vec<u32> = (1..=23).collect();
        assert!(paginate(&items, PageRequest::new(4, 10)).is_empty());
        assert!(paginate(&items, PageRequest::new(u32::MAX, 100)).is_empty());
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::new(PageRequest::new(2, 10), 23);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next());
        assert!(info.has_previous());

        let last = PageInfo::new(PageRequest::new(3, 10), 23);
        assert!(!last.has_next());
    }

    #[test]
    fn test_page_info_serializes_camel_case() {
        let info = PageInfo::new(PageRequest::new(1, 10), 4);
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["total"], 4);
    }
}
