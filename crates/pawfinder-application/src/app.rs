//! Top-level application state.
//!
//! `PawfinderApp` owns the session and wires the catalog, favorites and
//! match components to it. Front ends talk to this type only.

use std::sync::Arc;

use pawfinder_core::dog::DogApi;
use pawfinder_core::error::Result;
use pawfinder_core::favorites::{FavoritesRepository, Toggle};
use pawfinder_core::session::{SessionHandle, SessionStatus};
use tokio::sync::RwLock;

use crate::catalog::CatalogController;
use crate::favorites::FavoritesStore;
use crate::login::{LoginError, LoginUseCase};
use crate::matching::{MatchError, MatchOutcome, MatchRequester};
use crate::session_guard::SessionGuard;

pub struct PawfinderApp {
    api: Arc<dyn DogApi>,
    session: RwLock<Option<SessionHandle>>,
    catalog: Arc<CatalogController>,
    favorites: FavoritesStore,
    matcher: MatchRequester,
}

impl PawfinderApp {
    /// Builds the app and restores stored favorites.
    pub async fn new(
        api: Arc<dyn DogApi>,
        favorites_repository: Arc<dyn FavoritesRepository>,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogController::new(api.clone())),
            favorites: FavoritesStore::load(favorites_repository).await,
            matcher: MatchRequester::new(api.clone()),
            session: RwLock::new(None),
            api,
        }
    }

    /// Probes for an existing session.
    pub async fn start(&self) -> SessionStatus {
        let status = SessionGuard::new(self.api.clone()).check().await;
        if let Some(handle) = status.handle() {
            *self.session.write().await = Some(handle.clone());
        }
        status
    }

    pub async fn login(&self, name: &str, email: &str) -> std::result::Result<(), LoginError> {
        let handle = LoginUseCase::new(self.api.clone())
            .submit(name, email)
            .await?;
        *self.session.write().await = Some(handle);
        Ok(())
    }

    pub async fn session(&self) -> Option<SessionHandle> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Signs out.
    ///
    /// Local state (session, catalog, favorites, match) is cleared whether
    /// or not the service acknowledges the logout. The first error from the
    /// service call or the favorites removal is returned.
    pub async fn logout(&self) -> Result<()> {
        let handle = self.session.write().await.take();

        let remote = match &handle {
            Some(handle) => self.api.logout(handle).await,
            None => Ok(()),
        };
        if let Err(e) = &remote {
            tracing::error!(error = %e, details = ?e, "logout request failed, clearing local state anyway");
        }

        self.catalog.reset().await;
        self.matcher.clear().await;
        let local = self.favorites.clear().await;
        if let Err(e) = &local {
            tracing::error!(error = %e, "failed to remove stored favorites");
        }
        tracing::info!("signed out");

        remote.and(local)
    }

    pub async fn toggle_favorite(&self, id: &str) -> Result<Toggle> {
        self.favorites.toggle(id).await
    }

    /// Requests a match from the current favorites.
    pub async fn request_match(
        &self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> std::result::Result<MatchOutcome, MatchError> {
        let ids = self.favorites.ids().await;
        if ids.is_empty() {
            return Err(MatchError::NoFavorites);
        }
        let session = self.session().await.ok_or(MatchError::NotAuthenticated)?;
        self.matcher.request(&session, &ids, confirm).await
    }

    pub fn catalog(&self) -> &Arc<CatalogController> {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn matcher(&self) -> &MatchRequester {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryFavoritesRepository, MockDogApi, dog};
    use pawfinder_core::PawError;

    async fn app_with(
        api: Arc<MockDogApi>,
        repo: Arc<MemoryFavoritesRepository>,
    ) -> PawfinderApp {
        PawfinderApp::new(api, repo).await
    }

    #[tokio::test]
    async fn test_start_with_valid_cookie_is_authenticated() {
        let api = Arc::new(MockDogApi::new());
        let app = app_with(api, Arc::default()).await;

        assert!(app.start().await.is_authenticated());
        assert!(app.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_start_without_cookie_needs_login() {
        let api = Arc::new(MockDogApi::new());
        *api.probe.lock().unwrap() = Err(PawError::Unauthorized);
        let app = app_with(api, Arc::default()).await;

        assert_eq!(app.start().await, SessionStatus::Unauthenticated);
        assert!(app.session().await.is_none());

        app.login("Ada", "ada@example.com").await.unwrap();
        assert!(app.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_match_without_favorites_makes_no_call() {
        let api = Arc::new(MockDogApi::new());
        let app = app_with(api.clone(), Arc::default()).await;
        app.start().await;

        let err = app.request_match(|_| true).await.unwrap_err();

        assert!(matches!(err, MatchError::NoFavorites));
        assert_eq!(api.calls(), vec!["probe".to_string()]);
    }

    #[tokio::test]
    async fn test_match_requires_session() {
        let api = Arc::new(MockDogApi::new());
        let repo = Arc::new(MemoryFavoritesRepository::with_raw(r#"["a"]"#));
        let app = app_with(api, repo).await;

        let err = app.request_match(|_| true).await.unwrap_err();
        assert!(matches!(err, MatchError::NotAuthenticated));
    }

    async fn signed_in_with_match(api: &Arc<MockDogApi>, repo: &Arc<MemoryFavoritesRepository>) -> PawfinderApp {
        *api.match_result.lock().unwrap() = Ok("a".to_string());
        let app = app_with(api.clone(), repo.clone()).await;
        app.start().await;
        app.request_match(|_| true).await.unwrap();
        assert!(app.matcher().current().await.is_some());
        app
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let api = Arc::new(MockDogApi::new().with_dogs([dog("a", "Alpha")]));
        let repo = Arc::new(MemoryFavoritesRepository::with_raw(r#"["a"]"#));
        let app = signed_in_with_match(&api, &repo).await;

        app.logout().await.unwrap();

        assert!(app.session().await.is_none());
        assert!(app.favorites().snapshot().await.is_empty());
        assert!(repo.raw().is_none());
        assert!(app.matcher().current().await.is_none());
        assert_eq!(api.count("logout"), 1);
    }

    #[tokio::test]
    async fn test_logout_failure_still_clears_local_state() {
        let api = Arc::new(MockDogApi::new().with_dogs([dog("a", "Alpha")]));
        let repo = Arc::new(MemoryFavoritesRepository::with_raw(r#"["a"]"#));
        let app = signed_in_with_match(&api, &repo).await;
        *api.logout.lock().unwrap() = Err(PawError::network("offline"));

        let err = app.logout().await.unwrap_err();

        assert_eq!(err, PawError::network("offline"));
        assert!(app.session().await.is_none());
        assert!(app.favorites().snapshot().await.is_empty());
        assert!(repo.raw().is_none());
        assert!(app.matcher().current().await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_persists_through_app() {
        let repo = Arc::new(MemoryFavoritesRepository::default());
        let app = app_with(Arc::new(MockDogApi::new()), repo.clone()).await;

        app.toggle_favorite("12").await.unwrap();
        app.toggle_favorite("47").await.unwrap();

        assert_eq!(repo.raw().as_deref(), Some(r#"["12","47"]"#));
    }
}
