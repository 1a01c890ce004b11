use serde::{Deserialize, Serialize};

use crate::dog::model::DogId;

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Ordered set of favorite dog identifiers.
///
/// Serializes as a plain JSON array, which is also the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<DogId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from stored ids, dropping repeats but keeping first-seen order.
    pub fn from_ids(ids: impl IntoIterator<Item = DogId>) -> Self {
        let mut favorites = Self::new();
        for id in ids {
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    /// Appends `id` if absent, removes it if present.
    pub fn toggle(&mut self, id: &str) -> Toggle {
        if let Some(pos) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(pos);
            Toggle::Removed
        } else {
            self.ids.push(id.to_string());
            Toggle::Added
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[DogId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
