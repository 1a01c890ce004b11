pub mod config_service;
pub mod favorites_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::favorites_repository::JsonFavoritesRepository;
pub use crate::paths::PawfinderPaths;
