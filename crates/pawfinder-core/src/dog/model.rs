//! Dog catalog domain models.
//!
//! These types mirror the JSON shapes returned by the adoption service.

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to each dog by the service.
pub type DogId = String;

/// Breed name as listed by `GET /dogs/breeds`.
pub type Breed = String;

/// A fully hydrated dog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: DogId,
    /// Image URL
    pub img: String,
    pub name: String,
    /// Age in years
    pub age: u32,
    pub zip_code: String,
    pub breed: Breed,
}

/// One page of search results: identifiers only, hydrated separately.
///
/// `next` and `prev` are opaque cursors (query strings) and are never
/// interpreted by the client beyond "present or not".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub result_ids: Vec<DogId>,
    pub total: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// Body of `POST /dogs/match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "match")]
    pub matched: DogId,
}
