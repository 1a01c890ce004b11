//! Application layer for Pawfinder.
//!
//! Use cases coordinating the dog service client and the favorites
//! repository: session checks, login, catalog search, favorites and matching.

pub mod app;
pub mod catalog;
pub mod favorites;
pub mod login;
pub mod matching;
pub mod session_guard;

#[cfg(test)]
mod test_support;

pub use app::PawfinderApp;
pub use catalog::{CatalogController, CatalogSnapshot, FetchOutcome, FetchState, SearchTicket};
pub use favorites::FavoritesStore;
pub use login::{LoginError, LoginUseCase};
pub use matching::{MATCH_CONFIRMATION, MatchError, MatchOutcome, MatchRequester};
pub use session_guard::SessionGuard;
