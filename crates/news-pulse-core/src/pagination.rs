//! Pagination bounds derived from server-reported totals.
//!
//! The number of navigable pages is
//! `min(ceil(total_results / page_size), page_cap)`. The cap holds no matter
//! what the server reports, which keeps the pager short and stops a single
//! query from being paged arbitrarily deep.

/// Results requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Upper bound on navigable pages.
pub const DEFAULT_PAGE_CAP: u32 = 20;
/// Pages shown on each side of the current page in the pager.
pub const PAGE_WINDOW_RADIUS: u32 = 2;

/// Fixed pagination parameters for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub page_size: u32,
    pub page_cap: u32,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_cap: DEFAULT_PAGE_CAP,
        }
    }
}

impl PageBounds {
    pub fn new(page_size: u32, page_cap: u32) -> Self {
        Self {
            page_size,
            page_cap,
        }
    }

    /// Number of navigable pages for a server-reported total.
    pub fn total_pages(&self, total_results: u64) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        let pages = total_results.div_ceil(u64::from(self.page_size));
        pages.min(u64::from(self.page_cap)) as u32
    }
}

/// Page numbers within [`PAGE_WINDOW_RADIUS`] of `current`, clipped to
/// `1..=total_pages`.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages == 0 {
        return Vec::new();
    }
    let start = current.saturating_sub(PAGE_WINDOW_RADIUS).max(1);
    let end = current.saturating_add(PAGE_WINDOW_RADIUS).min(total_pages);
    (start..=end).collect()
}
