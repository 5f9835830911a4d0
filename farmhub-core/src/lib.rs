pub mod repository;

pub use repository::{
    CustomerRepository, FarmStore, OrderRepository, RepoError, RepoResult, RouteRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
