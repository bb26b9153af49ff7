//! Infrastructure layer: storage collaborators behind the policy core.

pub mod memory;
pub mod repository;

pub use memory::InMemoryRepository;
pub use repository::{Repository, RepositoryError, UserDirectory};
