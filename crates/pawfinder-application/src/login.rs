//! Login form submission.

use std::sync::Arc;

use pawfinder_core::PawError;
use pawfinder_core::dog::DogApi;
use pawfinder_core::session::{Credentials, SessionHandle};
use thiserror::Error;

/// Why a login attempt did not produce a session.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The form was rejected locally; nothing was sent.
    #[error("{0}")]
    Invalid(String),

    /// The service refused or could not be reached.
    #[error("Login failed. Please try again.")]
    Rejected(#[source] PawError),
}

impl LoginError {
    /// Invalid input is fixed by editing the form, rejections by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

pub struct LoginUseCase {
    api: Arc<dyn DogApi>,
}

impl LoginUseCase {
    pub fn new(api: Arc<dyn DogApi>) -> Self {
        Self { api }
    }

    /// Validates the form, then submits it.
    pub async fn submit(&self, name: &str, email: &str) -> Result<SessionHandle, LoginError> {
        let credentials = Credentials::new(name, email);
        if let Err(e) = credentials.validate() {
            let message = match e {
                PawError::Validation(message) => message,
                other => other.to_string(),
            };
            return Err(LoginError::Invalid(message));
        }

        self.api.login(&credentials).await.map_err(|e| {
            tracing::error!(error = %e, details = ?e, "login failed");
            LoginError::Rejected(e)
        })
    }
}
