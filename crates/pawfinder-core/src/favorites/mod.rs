//! Favorites: the user's durable selection of dogs eligible for matching.

pub mod model;
pub mod repository;

pub use model::{Favorites, Toggle};
pub use repository::FavoritesRepository;
