//! Pagination state machine.
//!
//! Maps (page, page size, total) to a derived page count and the navigation
//! operations a table offers. Every input is clamped or ignored, never
//! rejected. The controller does not fetch; callers re-query after a
//! mutation that returns `true`.

use serde::Serialize;

/// Offset-style query parameters for adapters that page by offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationParams {
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub limit: usize,
    /// Index of the first row on the page.
    pub offset: usize,
}

/// Current page, page size and total item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationController {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(1, 10, 0)
    }
}

impl PaginationController {
    /// Creates a controller. `page` is raised to 1 and `page_size` to 1 if
    /// given as zero.
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            total,
        }
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total item count across all pages, as last reported.
    pub fn total(&self) -> usize {
        self.total
    }

    /// `ceil(total / page_size)`, or 0 while the total is 0 (unknown).
    pub fn total_pages(&self) -> usize {
        Self::pages_for(self.total, self.page_size)
    }

    fn pages_for(total: usize, page_size: usize) -> usize {
        if total == 0 {
            0
        } else {
            total.div_ceil(page_size)
        }
    }

    /// Returns `true` if there is a page after the current one, or the page
    /// count is not known yet.
    pub fn has_next(&self) -> bool {
        let total_pages = self.total_pages();
        total_pages == 0 || self.page < total_pages
    }

    /// Returns `true` if the current page is not the first.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Records the total reported by the latest fetch.
    ///
    /// The current page is left as is: it is the page the total was
    /// reported for.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    /// Jumps to page `n`. Ignored unless `1 <= n <= total_pages`, or
    /// `n >= 1` while the page count is unknown.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        let total_pages = self.total_pages();
        if n >= 1 && (total_pages == 0 || n <= total_pages) {
            self.page = n;
            true
        } else {
            false
        }
    }

    /// Moves forward one page. No-op on the last known page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        match self.page.checked_add(1) {
            Some(page) => {
                self.page = page;
                true
            }
            None => false,
        }
    }

    /// Moves back one page. No-op on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Returns to the first page.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Changes the page size. A size of 0 is ignored.
    ///
    /// The page count is recomputed against the current total; if the
    /// current page no longer exists it is clamped to the new last page.
    pub fn change_page_size(&mut self, size: usize) -> bool {
        if size == 0 {
            return false;
        }
        self.page_size = size;
        let total_pages = self.total_pages();
        if total_pages > 0 && self.page > total_pages {
            self.page = total_pages;
        }
        true
    }

    /// Offset-style parameters for the current page.
    pub fn params(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.page_size,
            offset: self.page.saturating_sub(1).saturating_mul(self.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        for total in 0..60 {
            for page_size in 1..12 {
                let pagination = PaginationController::new(1, page_size, total);
                let expected = if total == 0 {
                    0
                } else {
                    (total + page_size - 1) / page_size
                };
                assert_eq!(pagination.total_pages(), expected, "{total}/{page_size}");
            }
        }
    }

    #[test]
    fn test_go_to_page_out_of_bounds_is_ignored() {
        let mut pagination = PaginationController::new(2, 5, 12);
        assert!(!pagination.go_to_page(0));
        assert!(!pagination.go_to_page(4));
        assert_eq!(pagination.page(), 2);
        assert!(pagination.go_to_page(3));
        assert_eq!(pagination.page(), 3);
    }

    #[test]
    fn test_go_to_page_with_unknown_total() {
        let mut pagination = PaginationController::new(1, 5, 0);
        assert!(pagination.go_to_page(42));
        assert_eq!(pagination.page(), 42);
        assert!(!pagination.go_to_page(0));
    }

    #[test]
    fn test_next_and_prev_stop_at_bounds() {
        let mut pagination = PaginationController::new(1, 5, 12);
        assert!(!pagination.prev_page());
        assert!(pagination.next_page());
        assert!(pagination.next_page());
        assert!(!pagination.next_page());
        assert_eq!(pagination.page(), 3);
        assert!(pagination.prev_page());
        assert_eq!(pagination.page(), 2);
    }

    #[test]
    fn test_shrinking_page_count_clamps_page() {
        let mut pagination = PaginationController::new(1, 5, 12);
        assert_eq!(pagination.total_pages(), 3);
        assert!(pagination.go_to_page(3));
        assert!(pagination.change_page_size(10));
        assert_eq!(pagination.total_pages(), 2);
        assert_eq!(pagination.page(), 2);
    }

    #[test]
    fn test_zero_page_size_is_ignored() {
        let mut pagination = PaginationController::new(2, 5, 12);
        assert!(!pagination.change_page_size(0));
        assert_eq!(pagination.page_size(), 5);
        assert_eq!(pagination.page(), 2);
    }

    #[test]
    fn test_params_offset() {
        let mut pagination = PaginationController::new(1, 25, 100);
        pagination.go_to_page(3);
        assert_eq!(
            pagination.params(),
            PaginationParams {
                page: 3,
                limit: 25,
                offset: 50
            }
        );
    }

    #[test]
    fn test_last_addressable_page_with_unknown_total() {
        let mut pagination = PaginationController::new(1, 25, 0);
        assert!(pagination.go_to_page(usize::MAX));

        assert_eq!(pagination.params().offset, usize::MAX);
        assert!(!pagination.next_page());
        assert_eq!(pagination.page(), usize::MAX);
        assert!(pagination.prev_page());
        assert_eq!(pagination.page(), usize::MAX - 1);
    }
}
