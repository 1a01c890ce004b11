//! Startup session check.

use std::sync::Arc;

use pawfinder_core::dog::DogApi;
use pawfinder_core::session::SessionStatus;

/// Decides between the login prompt and the catalog.
pub struct SessionGuard {
    api: Arc<dyn DogApi>,
}

impl SessionGuard {
    pub fn new(api: Arc<dyn DogApi>) -> Self {
        Self { api }
    }

    /// Probes the service once. Any failure means "not signed in"; nothing
    /// is shown to the user and nothing is retried.
    pub async fn check(&self) -> SessionStatus {
        match self.api.probe().await {
            Ok(handle) => {
                tracing::info!(origin = ?handle.origin(), "existing session accepted");
                SessionStatus::Authenticated(handle)
            }
            Err(e) => {
                tracing::debug!(error = %e, "session probe rejected");
                SessionStatus::Unauthenticated
            }
        }
    }
}
