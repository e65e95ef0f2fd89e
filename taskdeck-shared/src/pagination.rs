/// Shared pagination contract
///
/// Every list endpoint pages the same way: `page` is zero-based, `size` is
/// the page length, rows are skipped with `offset = page * size`. The
/// boundary validates that `page >= 0` and `size > 0` before anything here
/// runs; services trust the numbers they receive.
use serde::{Deserialize, Serialize};

/// One page of results plus the total row count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows on this page
    pub data: Vec<T>,

    /// Total rows across all pages
    pub total: i64,

    /// Zero-based page index this page was requested with
    pub page: i64,

    /// Requested page size
    pub size: i64,
}

impl<T> Page<T> {
    /// Assembles a page from fetched rows and a total count
    pub fn new(data: Vec<T>, total: i64, page: i64, size: i64) -> Self {
        Self {
            data,
            total,
            page,
            size,
        }
    }
}

/// Number of rows to skip for a given page
pub fn offset(page: i64, size: i64) -> i64 {
    page * size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_math() {
        assert_eq!(offset(0, 10), 0);
        assert_eq!(offset(1, 10), 10);
        assert_eq!(offset(3, 25), 75);
    }

    #[test]
    fn test_page_carries_request_parameters() {
        let page = Page::new(vec![1, 2, 3], 42, 2, 3);
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.total, 42);
        assert_eq!(page.page, 2);
        assert_eq!(page.size, 3);
    }

    #[test]
    fn test_page_serializes_all_fields() {
        let json = serde_json::to_value(Page::<i32>::new(vec![], 0, 0, 5)).unwrap();
        assert!(json["data"].as_array().unwrap().is_empty());
        assert_eq!(json["total"], 0);
        assert_eq!(json["page"], 0);
        assert_eq!(json["size"], 5);
    }
}
