//! Search + pagination model behind the generic data table.
//!
//! DESIGN
//! ======
//! Filtering and slicing are recomputed from the full in-memory array on every
//! change: O(n) per keystroke, no debounce, no server paging. That is fine for
//! the few hundred records an admin list holds.
//!
//! Changing the search term returns to page 1 so a narrowed result set never
//! leaves the view stranded past its last page.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Text used for both display and search. Strings lose their JSON quotes,
/// `null` is empty, everything else is its JSON rendering.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Case-insensitive substring match against every field of the row, not only
/// the displayed columns. An empty query matches everything.
pub fn row_matches(row: &Value, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    match row {
        Value::Object(fields) => fields.values().any(|v| cell_text(v).to_lowercase().contains(&needle)),
        other => cell_text(other).to_lowercase().contains(&needle),
    }
}

pub fn filter_rows<'a>(rows: &'a [Value], query: &str) -> Vec<&'a Value> {
    rows.iter().filter(|row| row_matches(row, query)).collect()
}

/// `ceil(count / page_size)`. A zero page size is treated as one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamp a 1-based page index into `[1, max(total, 1)]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// One rendered page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageSlice {
    pub rows: Vec<Value>,
    /// 1-based page actually shown.
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

impl PageSlice {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Table view state: search term and 1-based page index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView {
    pub search_term: String,
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableView {
    pub fn new(page_size: usize) -> Self {
        Self { search_term: String::new(), current_page: 1, page_size: page_size.max(1) }
    }

    pub fn set_search(&mut self, term: &str) {
        if self.search_term != term {
            self.search_term = term.to_owned();
            self.current_page = 1;
        }
    }

    /// Jump to `page`, clamped against the current filtered row count.
    pub fn go_to(&mut self, page: usize, rows: &[Value]) {
        let total = total_pages(filter_rows(rows, &self.search_term).len(), self.page_size);
        self.current_page = clamp_page(page, total);
    }

    pub fn next(&mut self, rows: &[Value]) {
        self.go_to(self.current_page.saturating_add(1), rows);
    }

    pub fn previous(&mut self, rows: &[Value]) {
        self.go_to(self.current_page.saturating_sub(1), rows);
    }

    /// Filter, clamp and slice. The stored page is clamped for display only,
    /// so a shrinking data set cannot produce an out-of-range page.
    pub fn slice(&self, rows: &[Value]) -> PageSlice {
        let filtered = filter_rows(rows, &self.search_term);
        let total = total_pages(filtered.len(), self.page_size);
        let page = clamp_page(self.current_page, total);
        let start = (page - 1) * self.page_size;

        PageSlice {
            rows: filtered.iter().skip(start).take(self.page_size).map(|v| (*v).clone()).collect(),
            page,
            total_pages: total,
            filtered_count: filtered.len(),
        }
    }
}
