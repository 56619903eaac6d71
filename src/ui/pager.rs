use std::ops::Range;

pub const PAGE_SIZE: usize = 5;

/// Client side pagination over an already fetched list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Zero based index of the current page
    pub fn page(&self) -> usize {
        self.page
    }

    /// An empty list still has one (empty) page
    pub fn page_count(&self, total: usize) -> usize {
        ((total + self.page_size - 1) / self.page_size).max(1)
    }

    pub fn next(&mut self, total: usize) {
        self.goto(self.page + 1, total);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn goto(&mut self, page: usize, total: usize) {
        self.page = page.min(self.page_count(total) - 1);
    }

    /// Pulls the page back in range after items were removed
    pub fn clamp(&mut self, total: usize) {
        self.goto(self.page, total);
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);

        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}
