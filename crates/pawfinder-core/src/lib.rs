pub mod config;
pub mod dog;
pub mod error;
pub mod favorites;
pub mod pagination;
pub mod search;
pub mod session;

// Re-export common error type
pub use error::PawError;
