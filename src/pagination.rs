/// Where the page loop currently stands.
///
/// Owned by the orchestrator and only touched between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub start: u64,
    pub page_size: u32,
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self {
            start: 0,
            page_size,
            total_count: 0,
            current_page: 0,
            total_pages: 0,
        }
    }

    pub fn set_total(&mut self, total_count: u64) {
        self.total_count = total_count;
        self.total_pages = page_count(total_count, self.page_size);
    }

    /// Rewinds to the first page.
    pub fn reset(&mut self) {
        self.start = 0;
        self.current_page = 1;
    }

    /// A run with zero listings processes zero pages.
    pub fn has_page(&self) -> bool {
        self.current_page >= 1 && self.current_page <= self.total_pages
    }

    /// Moves past the current page, whatever happened on it.
    pub fn advance(&mut self) {
        self.start += u64::from(self.page_size);
        self.current_page += 1;
    }
}

pub fn page_count(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size))
}
