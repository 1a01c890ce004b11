//! Dog catalog domain: records, search pages and the remote catalog seam.

pub mod api;
pub mod model;

pub use api::DogApi;
pub use model::{Breed, Dog, DogId, MatchResult, SearchPage};
