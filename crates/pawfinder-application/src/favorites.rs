//! Favorites store: in-memory set mirrored to a repository.

use std::sync::Arc;

use pawfinder_core::dog::DogId;
use pawfinder_core::error::Result;
use pawfinder_core::favorites::{Favorites, FavoritesRepository, Toggle};
use tokio::sync::RwLock;

pub struct FavoritesStore {
    repository: Arc<dyn FavoritesRepository>,
    favorites: RwLock<Favorites>,
}

impl FavoritesStore {
    /// Restores the stored list.
    ///
    /// A missing or unreadable entry yields an empty set; the latter is logged.
    pub async fn load(repository: Arc<dyn FavoritesRepository>) -> Self {
        let favorites = match repository.load().await {
            Ok(Some(ids)) => Favorites::from_ids(ids),
            Ok(None) => Favorites::new(),
            Err(e) => {
                tracing::warn!(error = %e, "stored favorites unreadable, starting empty");
                Favorites::new()
            }
        };
        tracing::debug!(count = favorites.len(), "favorites restored");

        Self {
            repository,
            favorites: RwLock::new(favorites),
        }
    }

    /// Flips membership of `id` and persists the whole list.
    ///
    /// The in-memory change stands even if the write fails.
    pub async fn toggle(&self, id: &str) -> Result<Toggle> {
        let mut favorites = self.favorites.write().await;
        let toggle = favorites.toggle(id);
        tracing::debug!(id, ?toggle, count = favorites.len(), "favorite toggled");

        if let Err(e) = self.repository.save(favorites.ids()).await {
            tracing::error!(error = %e, "failed to persist favorites");
            return Err(e);
        }
        Ok(toggle)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.favorites.read().await.contains(id)
    }

    pub async fn ids(&self) -> Vec<DogId> {
        self.favorites.read().await.ids().to_vec()
    }

    pub async fn snapshot(&self) -> Favorites {
        self.favorites.read().await.clone()
    }

    /// Empties the set and drops the stored entry.
    pub async fn clear(&self) -> Result<()> {
        let mut favorites = self.favorites.write().await;
        favorites.clear();
        self.repository.remove().await
    }
}
