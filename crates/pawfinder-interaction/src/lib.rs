//! Remote service clients.

pub mod fetch_api_client;

pub use fetch_api_client::FetchApiClient;
