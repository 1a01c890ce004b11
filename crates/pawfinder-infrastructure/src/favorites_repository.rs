//! File-backed favorites repository.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pawfinder_core::dog::DogId;
use pawfinder_core::error::{PawError, Result};
use pawfinder_core::favorites::FavoritesRepository;

use crate::storage::AtomicJsonFile;

/// Stores the favorites list as a JSON array in `favorites.json`.
///
/// File access runs on the blocking pool; each call completes its write
/// before returning.
#[derive(Clone)]
pub struct JsonFavoritesRepository {
    file: Arc<AtomicJsonFile<Vec<DogId>>>,
}

impl JsonFavoritesRepository {
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn blocking<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicJsonFile<Vec<DogId>>) -> Result<R> + Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| PawError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl FavoritesRepository for JsonFavoritesRepository {
    async fn load(&self) -> Result<Option<Vec<DogId>>> {
        self.blocking(|file| Ok(file.load()?)).await
    }

    async fn save(&self, ids: &[DogId]) -> Result<()> {
        let ids = ids.to_vec();
        self.blocking(move |file| Ok(file.save(&ids)?)).await?;
        tracing::debug!(path = %self.path().display(), "favorites saved");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        self.blocking(|file| Ok(file.remove()?)).await?;
        tracing::debug!(path = %self.path().display(), "favorites removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonFavoritesRepository::with_path(temp_dir.path().join("favorites.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_writes_plain_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favorites.json");
        let repo = JsonFavoritesRepository::with_path(path.clone());

        repo.save(&["12".to_string(), "47".to_string()]).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec!["12".to_string(), "47".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favorites.json");
        std::fs::write(&path, "[12, oops").unwrap();

        let repo = JsonFavoritesRepository::with_path(path);
        let err = repo.load().await.unwrap_err();
        assert!(err.is_serialization());
    }
}
