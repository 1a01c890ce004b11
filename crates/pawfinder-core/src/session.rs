//! Session capability and login credentials.
//!
//! The adoption service keeps its session in an HTTP-only cookie, so the client
//! never sees a token. Instead of a boolean flag, a successful probe or login
//! hands out a [`SessionHandle`]. Every authenticated call takes one, which
//! makes "called before logging in" unrepresentable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{PawError, Result};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("invalid email regex: {e}"))
});

/// How a session came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// An existing cookie was accepted by the probe.
    Probe,
    /// A fresh login succeeded.
    Login,
}

/// Proof that the service accepted our cookie at some point.
///
/// Carries no secret. It is not persisted and is dropped on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    origin: SessionOrigin,
}

impl SessionHandle {
    /// Issues a handle. Only API clients should call this, after the
    /// service has answered successfully.
    pub fn issue(origin: SessionOrigin) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }
}

/// Outcome of the startup probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated(SessionHandle),
    Unauthenticated,
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn handle(&self) -> Option<&SessionHandle> {
        match self {
            Self::Authenticated(handle) => Some(handle),
            Self::Unauthenticated => None,
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub name: String,
    pub email: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
        }
    }

    /// Checks the form before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PawError::validation("Please enter your name."));
        }
        if !is_valid_email(&self.email) {
            return Err(PawError::validation("Please enter a valid email address."));
        }
        Ok(())
    }
}

/// Returns true if `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_credentials_trim_and_validate() {
        let creds = Credentials::new("  Ada ", " ada@example.com ");
        assert_eq!(creds.name, "Ada");
        assert_eq!(creds.email, "ada@example.com");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_credentials_reject_empty_name() {
        let err = Credentials::new("   ", "ada@example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, PawError::Validation(_)));
    }

    #[test]
    fn test_credentials_reject_bad_email() {
        let err = Credentials::new("Ada", "not-an-email").validate().unwrap_err();
        assert_eq!(
            err,
            PawError::validation("Please enter a valid email address.")
        );
    }

    #[test]
    fn test_session_status_handle() {
        let handle = SessionHandle::issue(SessionOrigin::Probe);
        let status = SessionStatus::Authenticated(handle.clone());
        assert!(status.is_authenticated());
        assert_eq!(status.handle(), Some(&handle));
        assert_eq!(handle.origin(), SessionOrigin::Probe);
        assert!(SessionStatus::Unauthenticated.handle().is_none());
    }
}
