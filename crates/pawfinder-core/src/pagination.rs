//! Page-window computation for the pagination bar.

use std::fmt;

/// Pages shown on either side of the current one.
pub const WINDOW_RADIUS: usize = 3;

/// At or below this many pages, every page is listed.
const SHOW_ALL_LIMIT: usize = 2 * WINDOW_RADIUS + 1;

/// One slot in the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// Zero-based page index.
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(index) => write!(f, "{}", index),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Everything needed to draw the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub items: Vec<PageItem>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl Pagination {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        let last = total_pages.checked_sub(1);
        Self {
            current_page,
            total_pages,
            items: page_window(current_page, total_pages),
            prev_enabled: total_pages > 0 && current_page > 0,
            next_enabled: last.is_some_and(|last| current_page < last),
        }
    }

    /// The page a click on `item` selects. Ellipses select nothing.
    pub fn select(&self, item: PageItem) -> Option<usize> {
        match item {
            PageItem::Page(index) if index < self.total_pages => Some(index),
            _ => None,
        }
    }
}

/// Window of page slots centered on `current_page`.
///
/// With more than seven pages the window spans `current_page ± 3`, and the
/// first and last page are always present. An ellipsis marks each side where
/// the window was clipped short of the edge page.
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= SHOW_ALL_LIMIT {
        return (0..total_pages).map(PageItem::Page).collect();
    }

    let last = total_pages - 1;
    let current = current_page.min(last);
    let start = current.saturating_sub(WINDOW_RADIUS);
    let end = (current + WINDOW_RADIUS).min(last);

    let mut items = Vec::with_capacity(end - start + 5);
    if start > 0 {
        items.push(PageItem::Page(0));
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < last {
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(last));
    }
    items
}
