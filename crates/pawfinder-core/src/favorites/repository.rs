//! Favorites repository trait.

use async_trait::async_trait;

use crate::dog::model::DogId;
use crate::error::Result;

/// Durable storage for the favorites list.
///
/// The whole list is stored as one entry and rewritten on every change.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Reads the stored list.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. Unreadable or
    /// malformed contents are an error; callers decide how to recover.
    async fn load(&self) -> Result<Option<Vec<DogId>>>;

    /// Replaces the stored list with `ids`.
    async fn save(&self, ids: &[DogId]) -> Result<()>;

    /// Removes the entry entirely. Succeeds if there was nothing to remove.
    async fn remove(&self) -> Result<()>;
}
