//! Match requests against the favorites set.

use std::sync::Arc;

use pawfinder_core::PawError;
use pawfinder_core::dog::{Dog, DogApi, DogId};
use pawfinder_core::session::SessionHandle;
use thiserror::Error;
use tokio::sync::RwLock;

/// Question put to the user before a match is requested.
pub const MATCH_CONFIRMATION: &str = "Generate a match from your favorite dogs?";

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Please add at least one dog to favorites before matching.")]
    NoFavorites,

    #[error("Please log in before matching.")]
    NotAuthenticated,

    #[error("Match failed. Please try again.")]
    Failed(#[source] PawError),

    /// The service matched an id it then could not describe.
    #[error("Matched dog {0} could not be loaded.")]
    MissingRecord(DogId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(Dog),
    Declined,
}

pub struct MatchRequester {
    api: Arc<dyn DogApi>,
    current: RwLock<Option<Dog>>,
}

impl MatchRequester {
    pub fn new(api: Arc<dyn DogApi>) -> Self {
        Self {
            api,
            current: RwLock::new(None),
        }
    }

    /// Asks for confirmation, then requests and loads a match.
    ///
    /// `confirm` is only consulted when `favorites` is non-empty. On any
    /// failure the previous match stays in place.
    pub async fn request(
        &self,
        session: &SessionHandle,
        favorites: &[DogId],
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<MatchOutcome, MatchError> {
        if favorites.is_empty() {
            return Err(MatchError::NoFavorites);
        }
        if !confirm(MATCH_CONFIRMATION) {
            tracing::debug!("match declined");
            return Ok(MatchOutcome::Declined);
        }

        let matched_id = self
            .api
            .match_dog(session, favorites)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, details = ?e, "match request failed");
                MatchError::Failed(e)
            })?;

        let dog = self
            .api
            .dogs(session, std::slice::from_ref(&matched_id))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, details = ?e, "failed to load matched dog");
                MatchError::Failed(e)
            })?
            .into_iter()
            .find(|dog| dog.id == matched_id)
            .ok_or_else(|| {
                tracing::error!(id = %matched_id, "matched dog missing from lookup");
                MatchError::MissingRecord(matched_id.clone())
            })?;

        tracing::info!(id = %dog.id, name = %dog.name, candidates = favorites.len(), "match found");
        *self.current.write().await = Some(dog.clone());
        Ok(MatchOutcome::Matched(dog))
    }

    pub async fn current(&self) -> Option<Dog> {
        self.current.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.current.write().await = None;
    }
}
