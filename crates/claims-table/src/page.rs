use serde::Serialize;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered to operators.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Position of one page within a result set.
///
/// `page` is 1-based and always within `1..=total_pages`; `start..end` is
/// the window into the full result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

impl PageInfo {
    /// Compute the window for a requested page, clamping it into range.
    ///
    /// A page size of zero is treated as one. An empty result has one
    /// (empty) page.
    pub fn new(total_items: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);
        let start = ((page - 1) * page_size).min(total_items);
        let end = (start + page_size).min(total_items);
        Self {
            page,
            page_size,
            total_items,
            total_pages,
            start,
            end,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// e.g. `"Showing 11 to 20 of 25 results"`.
    pub fn describe(&self) -> String {
        if self.total_items == 0 {
            return "No results".to_string();
        }
        format!(
            "Showing {} to {} of {} results",
            self.start + 1,
            self.end,
            self.total_items
        )
    }
}

/// Slice out one page of `items`.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> (&[T], PageInfo) {
    let info = PageInfo::new(items.len(), page, page_size);
    (&items[info.start..info.end], info)
}
