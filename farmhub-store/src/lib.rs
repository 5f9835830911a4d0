pub mod app_config;
pub mod error;
pub mod memory_repo;
pub mod rest_repo;

pub use error::StoreError;
pub use memory_repo::InMemoryStore;
pub use rest_repo::RestStore;
