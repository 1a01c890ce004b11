//! FetchApiClient - REST client for the dog adoption service.
//!
//! The service authenticates with an HTTP-only cookie set by `/auth/login`.
//! All requests go through one `reqwest::Client` with a cookie store, so the
//! cookie rides along automatically and never surfaces in application code.

use std::time::Duration;

use async_trait::async_trait;
use pawfinder_core::config::ApiConfig;
use pawfinder_core::dog::{Breed, Dog, DogApi, DogId, MatchResult, SearchPage};
use pawfinder_core::error::{PawError, Result};
use pawfinder_core::search::SearchCriteria;
use pawfinder_core::session::{Credentials, SessionHandle, SessionOrigin};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP implementation of [`DogApi`].
#[derive(Clone)]
pub struct FetchApiClient {
    client: Client,
    base_url: String,
}

impl FetchApiClient {
    /// Creates a client for `base_url` with an optional per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PawError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the `[api]` section of the config file.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns transport failures and non-2xx answers
    /// into `PawError`s.
    async fn send(&self, what: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PawError::network(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PawError::Unauthorized);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PawError::http(
                status.as_u16(),
                format!("{} failed: {}", what, error_text.trim()),
            ));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, what: &str, request: RequestBuilder) -> Result<T> {
        self.send(what, request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| PawError::Serialization {
                format: "JSON".to_string(),
                message: format!("Failed to parse {} response: {}", what, e),
            })
    }
}

#[async_trait]
impl DogApi for FetchApiClient {
    async fn probe(&self) -> Result<SessionHandle> {
        self.send("Session probe", self.client.get(self.url("/dogs/breeds")))
            .await?;
        Ok(SessionHandle::issue(SessionOrigin::Probe))
    }

    async fn login(&self, credentials: &Credentials) -> Result<SessionHandle> {
        let request = self.client.post(self.url("/auth/login")).json(credentials);
        self.send("Login", request).await?;
        tracing::info!(name = %credentials.name, "logged in");
        Ok(SessionHandle::issue(SessionOrigin::Login))
    }

    async fn logout(&self, _session: &SessionHandle) -> Result<()> {
        self.send("Logout", self.client.post(self.url("/auth/logout")))
            .await?;
        tracing::info!("logged out");
        Ok(())
    }

    async fn breeds(&self, _session: &SessionHandle) -> Result<Vec<Breed>> {
        self.send_json("Breeds", self.client.get(self.url("/dogs/breeds")))
            .await
    }

    async fn search(
        &self,
        _session: &SessionHandle,
        criteria: &SearchCriteria,
    ) -> Result<SearchPage> {
        let query = criteria.to_query();
        tracing::debug!(?query, "searching dogs");
        let request = self.client.get(self.url("/dogs/search")).query(&query);
        self.send_json("Search", request).await
    }

    async fn dogs(&self, _session: &SessionHandle, ids: &[DogId]) -> Result<Vec<Dog>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = self.client.post(self.url("/dogs")).json(ids);
        self.send_json("Dog lookup", request).await
    }

    async fn match_dog(&self, _session: &SessionHandle, ids: &[DogId]) -> Result<DogId> {
        let request = self.client.post(self.url("/dogs/match")).json(ids);
        let result: MatchResult = self.send_json("Match", request).await?;
        Ok(result.matched)
    }
}
