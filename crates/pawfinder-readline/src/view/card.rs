//! One dog, one block of text.

use colored::Colorize;
use pawfinder_core::dog::Dog;

const FAVORITE_MARKER: &str = "♥";
const PLAIN_MARKER: &str = "♡";

/// Renders `dog` as a card. `label` is what the user types to refer to it
/// (`#3`, `match`).
pub fn render_card(label: &str, dog: &Dog, favorite: bool) -> String {
    let marker = if favorite {
        FAVORITE_MARKER.bright_red().to_string()
    } else {
        PLAIN_MARKER.bright_black().to_string()
    };
    let years = if dog.age == 1 { "year" } else { "years" };

    format!(
        "{} {} {}  {}\n    {}, {} {} old, zip {}\n    {}",
        marker,
        label.bright_black(),
        dog.name.bold(),
        format!("[{}]", dog.id).bright_black(),
        dog.breed,
        dog.age,
        years,
        dog.zip_code,
        dog.img.underline(),
    )
}
