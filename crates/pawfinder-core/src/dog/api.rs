//! Remote catalog trait.

use async_trait::async_trait;

use crate::dog::model::{Breed, Dog, DogId, SearchPage};
use crate::error::Result;
use crate::search::SearchCriteria;
use crate::session::{Credentials, SessionHandle};

/// The adoption service as seen by the application layer.
///
/// Every method is a single request. Implementations must not retry.
#[async_trait]
pub trait DogApi: Send + Sync {
    /// Tests whether the current cookie is still accepted.
    ///
    /// Issues `GET /dogs/breeds` and discards the body.
    async fn probe(&self) -> Result<SessionHandle>;

    /// `POST /auth/login`. On success the service sets the session cookie.
    async fn login(&self, credentials: &Credentials) -> Result<SessionHandle>;

    /// `POST /auth/logout`.
    async fn logout(&self, session: &SessionHandle) -> Result<()>;

    /// `GET /dogs/breeds`.
    async fn breeds(&self, session: &SessionHandle) -> Result<Vec<Breed>>;

    /// `GET /dogs/search` with the query derived from `criteria`.
    async fn search(&self, session: &SessionHandle, criteria: &SearchCriteria)
        -> Result<SearchPage>;

    /// `POST /dogs`: hydrates identifiers into full records.
    async fn dogs(&self, session: &SessionHandle, ids: &[DogId]) -> Result<Vec<Dog>>;

    /// `POST /dogs/match`: asks the service to pick one of `ids`.
    async fn match_dog(&self, session: &SessionHandle, ids: &[DogId]) -> Result<DogId>;
}
