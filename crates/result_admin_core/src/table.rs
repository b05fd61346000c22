//! crates/result_admin_core/src/table.rs
//!
//! In-memory pagination over the collection a workflow last loaded.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("page size must be one of 5, 10, 25 or 50, got {0}")]
pub struct PageSizeError(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PageSizeError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == n)
            .ok_or(PageSizeError(n))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Row-level actions. Handlers receive the record itself, never an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

/// What the table shows for the current page.
#[derive(Debug, PartialEq)]
pub enum TableView<'a, T> {
    /// Zero-state affordance; the backing collection is empty.
    Empty,
    Rows(&'a [T]),
}

#[derive(Debug, Clone)]
pub struct PaginatedTable<T> {
    items: Vec<T>,
    page: usize,
    page_size: PageSize,
}

impl<T> Default for PaginatedTable<T> {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl<T> PaginatedTable<T> {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size,
        }
    }

    /// Replaces the backing sequence and returns to the first page.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 0;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size.get())
    }

    /// Moves to page `n`, clamped to the last page that has rows.
    pub fn set_page(&mut self, n: usize) {
        self.page = n.min(self.page_count().saturating_sub(1));
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 0;
    }

    pub fn visible(&self) -> TableView<'_, T> {
        if self.items.is_empty() {
            return TableView::Empty;
        }
        let size = self.page_size.get();
        let start = (self.page * size).min(self.items.len());
        let end = (start + size).min(self.items.len());
        TableView::Rows(&self.items[start..end])
    }

    /// Human-readable range of the visible rows, e.g. "11-20 of 42".
    pub fn range_label(&self) -> String {
        if self.items.is_empty() {
            return "0 of 0".to_string();
        }
        let size = self.page_size.get();
        let start = self.page * size + 1;
        let end = ((self.page + 1) * size).min(self.items.len());
        format!("{}-{} of {}", start, end, self.items.len())
    }
}
