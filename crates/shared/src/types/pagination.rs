//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    30
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Current page number.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(request.per_page.max(1))
        };

        Self {
            data,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), 30);
    }

    #[rstest]
    #[case(1, 30, 0)]
    #[case(3, 30, 60)]
    #[case(2, 100, 100)]
    #[case(0, 30, 0)] // page 0 clamps to the start
    fn test_offsets(#[case] page: u64, #[case] per_page: u64, #[case] offset: u64) {
        let request = PageRequest { page, per_page };
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(61, 30, 3)]
    #[case(60, 30, 2)]
    #[case(1, 30, 1)]
    fn test_total_pages_round_up(#[case] total: u64, #[case] per_page: u64, #[case] pages: u64) {
        let response = PageResponse::new(vec![0u8], PageRequest { page: 1, per_page }, total);
        assert_eq!(response.total_pages, pages);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let response: PageResponse<u8> = PageResponse::new(vec![], PageRequest::default(), 0);
        assert_eq!(response.total_pages, 1);
        assert_eq!(response.total, 0);
    }
}
