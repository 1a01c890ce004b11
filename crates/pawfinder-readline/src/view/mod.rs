//! Text rendering for the REPL screens.

pub mod boundary;
pub mod card;
pub mod pagination;

pub use boundary::ErrorBoundary;
pub use card::render_card;
pub use pagination::render_pagination;

use colored::Colorize;
use pawfinder_application::CatalogSnapshot;
use pawfinder_core::dog::{Dog, DogId};
use pawfinder_core::favorites::Favorites;
use pawfinder_core::search::{BreedQuery, SearchCriteria, SortOrder};

use crate::commands::COMMANDS;
use crate::tracing_layer::Diagnostic;

/// The catalog screen: active filters, cards, pagination and favorites count.
pub fn render_catalog(snapshot: &CatalogSnapshot, favorites: &Favorites) -> anyhow::Result<String> {
    let mut lines = vec![render_criteria(&snapshot.criteria)];

    if let Some(error) = &snapshot.breeds_state.error {
        lines.push(error.red().to_string());
    }
    if let Some(error) = &snapshot.dogs_state.error {
        lines.push(format!("{} {}", error.red(), "(/refresh to retry)".bright_black()));
    }
    if snapshot.dogs_state.loading {
        lines.push("Loading dogs…".bright_black().to_string());
    }

    if snapshot.dogs.is_empty() && !snapshot.dogs_state.loading {
        lines.push("No dogs match these filters.".bright_black().to_string());
    }
    for (index, dog) in snapshot.dogs.iter().enumerate() {
        lines.push(render_card(
            &format!("#{}", index + 1),
            dog,
            favorites.contains(&dog.id),
        ));
    }

    let bar = render_pagination(&snapshot.pagination());
    if !bar.is_empty() {
        lines.push(bar);
    }
    lines.push(favorites_count(favorites.len()));

    Ok(lines.join("\n"))
}

fn render_criteria(criteria: &SearchCriteria) -> String {
    let mut filters = Vec::new();
    match &criteria.breed {
        BreedQuery::Any => {}
        BreedQuery::Selected(breed) => filters.push(format!("breed {}", breed)),
        BreedQuery::Text(text) => filters.push(format!("search \"{}\"", text)),
    }
    if let Some(zip) = &criteria.zip_code {
        filters.push(format!("zip {}", zip));
    }
    match (criteria.age_min, criteria.age_max) {
        (Some(min), Some(max)) => filters.push(format!("age {}-{}", min, max)),
        (Some(min), None) => filters.push(format!("age {}+", min)),
        (None, Some(max)) => filters.push(format!("age up to {}", max)),
        (None, None) => {}
    }

    let filters = if filters.is_empty() {
        "all dogs".to_string()
    } else {
        filters.join(", ")
    };
    format!(
        "{} {}  {}",
        "Dogs:".bold(),
        filters,
        format!("sorted by {}", criteria.sort.label()).bright_black()
    )
}

pub fn favorites_count(count: usize) -> String {
    let noun = if count == 1 { "dog" } else { "dogs" };
    format!("{} {} in your favorites", count, noun)
        .bright_magenta()
        .to_string()
}

pub fn render_match(dog: &Dog, favorite: bool) -> String {
    format!(
        "{}\n{}",
        "Your match:".bright_green().bold(),
        render_card("match", dog, favorite)
    )
}

/// Favorites by id. Dogs currently on screen are shown by name too.
pub fn render_favorites(ids: &[DogId], on_screen: &[Dog]) -> String {
    if ids.is_empty() {
        return "No favorites yet. Use /fav to add some.".bright_black().to_string();
    }
    let mut lines = vec![favorites_count(ids.len())];
    for id in ids {
        match on_screen.iter().find(|dog| &dog.id == id) {
            Some(dog) => lines.push(format!("  ♥ {} ({})", id, dog.name)),
            None => lines.push(format!("  ♥ {}", id)),
        }
    }
    lines.join("\n")
}

pub fn render_breeds(breeds: &[String], selected: Option<&str>) -> String {
    if breeds.is_empty() {
        return "No breeds loaded.".bright_black().to_string();
    }
    breeds
        .iter()
        .map(|breed| {
            if Some(breed.as_str()) == selected {
                format!("* {}", breed.bold())
            } else {
                format!("  {}", breed)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_sort_options(current: SortOrder) -> String {
    SortOrder::all()
        .into_iter()
        .map(|order| {
            let line = format!("{:<10} {}", order.to_string(), order.label());
            if order == current {
                format!("* {}", line.bold())
            } else {
                format!("  {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_diagnostics(entries: &[Diagnostic]) -> String {
    if entries.is_empty() {
        return "No warnings or errors.".bright_black().to_string();
    }
    entries
        .iter()
        .map(|entry| {
            let level = if entry.level == "ERROR" {
                entry.level.red()
            } else {
                entry.level.yellow()
            };
            let mut fields: Vec<String> = entry
                .fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            fields.sort();
            format!(
                "{} {} {} {} {}",
                entry.timestamp.bright_black(),
                level,
                entry.target.bright_black(),
                entry.message,
                fields.join(" ").bright_black()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_help() -> String {
    let mut lines: Vec<String> = COMMANDS
        .iter()
        .map(|(name, help)| format!("  {:<11}{}", name.bright_cyan(), help))
        .collect();
    lines.push(format!("  {:<11}leave", "quit".bright_cyan()));
    lines.join("\n")
}
