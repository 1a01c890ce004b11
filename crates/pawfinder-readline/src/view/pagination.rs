//! Pagination bar.

use colored::Colorize;
use pawfinder_core::pagination::{PageItem, Pagination};

/// Renders the bar with 1-based page numbers, the current page bracketed.
/// Disabled arrows are dimmed. Empty when there are no pages.
pub fn render_pagination(pagination: &Pagination) -> String {
    if pagination.total_pages == 0 {
        return String::new();
    }

    let arrow = |text: &str, enabled: bool| {
        if enabled {
            text.bright_cyan().to_string()
        } else {
            text.bright_black().to_string()
        }
    };

    let mut parts = vec![arrow("< prev", pagination.prev_enabled)];
    for item in &pagination.items {
        parts.push(match item {
            PageItem::Page(index) if *index == pagination.current_page => {
                format!("[{}]", index + 1).bold().to_string()
            }
            PageItem::Page(index) => (index + 1).to_string(),
            PageItem::Ellipsis => "…".to_string(),
        });
    }
    parts.push(arrow("next >", pagination.next_enabled));

    format!(
        "{}   {}",
        parts.join(" "),
        format!(
            "Page {} of {}",
            pagination.current_page + 1,
            pagination.total_pages
        )
        .bright_black()
    )
}
