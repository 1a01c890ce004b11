//! REPL command parsing.

use pawfinder_core::search::{CriteriaAction, MAX_AGE, SortOrder};
use thiserror::Error;

/// Every command, with its argument hint, in help order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/search", "<text>   free-text breed search (empty clears)"),
    ("/breed", "[name]   select a breed, or clear the selection"),
    ("/breeds", "         list breeds"),
    ("/zip", "[code]   set or clear the zip code"),
    ("/age-min", "[n]      minimum age (0-20)"),
    ("/age-max", "[n]      maximum age (0-20)"),
    ("/sort", "[field:dir]  change sort order, or list options"),
    ("/page", "<n>      go to page n"),
    ("/next", "         next page"),
    ("/prev", "         previous page"),
    ("/fav", "<id|#n|match>  toggle a favorite"),
    ("/favorites", "         list favorites"),
    ("/match", "         find a match among your favorites"),
    ("/refresh", "         reload the current page"),
    ("/log", "         recent warnings and errors"),
    ("/retry", "         re-render after a display error"),
    ("/logout", "         sign out"),
    ("/help", "         this list"),
];

/// Which dog a `/fav` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteTarget {
    Id(String),
    /// Zero-based position in the displayed list.
    Card(usize),
    Match,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Breed(Option<String>),
    Breeds,
    Zip(Option<String>),
    AgeMin(Option<u32>),
    AgeMax(Option<u32>),
    Sort(Option<SortOrder>),
    /// Zero-based.
    Page(usize),
    Next,
    Prev,
    Favorite(FavoriteTarget),
    Favorites,
    Match,
    Refresh,
    Log,
    Retry,
    Logout,
    Help,
    Quit,
}

impl Command {
    /// The criteria edit this command performs, if it is one.
    pub fn criteria_action(&self) -> Option<CriteriaAction> {
        let action = match self {
            Command::Search(text) => CriteriaAction::SearchText(text.clone()),
            Command::Breed(breed) => CriteriaAction::SelectBreed(breed.clone()),
            Command::Zip(zip) => CriteriaAction::ZipCode(zip.clone()),
            Command::AgeMin(age) => CriteriaAction::AgeMin(*age),
            Command::AgeMax(age) => CriteriaAction::AgeMax(*age),
            Command::Sort(Some(sort)) => CriteriaAction::Sort(*sort),
            Command::Page(page) => CriteriaAction::GoToPage(*page),
            Command::Next => CriteriaAction::NextPage,
            Command::Prev => CriteriaAction::PrevPage,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}. Type /help for a list.")]
    Unknown(String),
    #[error("{command} needs {expected}.")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("{0}")]
    Invalid(String),
}

/// Parses one input line. Blank input is not a command and should be
/// skipped by the caller.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Ok(Command::Quit);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match name {
        "/search" => Command::Search(rest.to_string()),
        "/breed" => Command::Breed(arg),
        "/breeds" => Command::Breeds,
        "/zip" => Command::Zip(arg),
        "/age-min" => Command::AgeMin(parse_age(arg)?),
        "/age-max" => Command::AgeMax(parse_age(arg)?),
        "/sort" => Command::Sort(
            arg.map(|s| s.parse::<SortOrder>())
                .transpose()
                .map_err(|e| CommandError::Invalid(e.to_string()))?,
        ),
        "/page" => Command::Page(parse_page(arg)?),
        "/next" => Command::Next,
        "/prev" => Command::Prev,
        "/fav" => Command::Favorite(parse_favorite(arg)?),
        "/favorites" => Command::Favorites,
        "/match" => Command::Match,
        "/refresh" => Command::Refresh,
        "/log" => Command::Log,
        "/retry" => Command::Retry,
        "/logout" => Command::Logout,
        "/help" => Command::Help,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn parse_age(arg: Option<String>) -> Result<Option<u32>, CommandError> {
    let Some(arg) = arg else {
        return Ok(None);
    };
    match arg.parse::<u32>() {
        Ok(age) if age <= MAX_AGE => Ok(Some(age)),
        _ => Err(CommandError::Invalid(format!(
            "Age must be a whole number from 0 to {}.",
            MAX_AGE
        ))),
    }
}

fn parse_page(arg: Option<String>) -> Result<usize, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument {
        command: "/page",
        expected: "a page number",
    })?;
    match arg.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page - 1),
        _ => Err(CommandError::Invalid(format!(
            "Not a page number: {}",
            arg
        ))),
    }
}

fn parse_favorite(arg: Option<String>) -> Result<FavoriteTarget, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument {
        command: "/fav",
        expected: "a dog id, #n for the n-th card, or 'match'",
    })?;

    if arg == "match" {
        return Ok(FavoriteTarget::Match);
    }
    if let Some(position) = arg.strip_prefix('#') {
        return match position.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(FavoriteTarget::Card(n - 1)),
            _ => Err(CommandError::Invalid(format!("Not a card number: {}", arg))),
        };
    }
    Ok(FavoriteTarget::Id(arg))
}
