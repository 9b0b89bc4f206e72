//! Wire-format records exchanged with the GraphDB REST API.

pub mod repositories;
pub mod users;

// Re-exports
pub use repositories::{RepositoryDetail, RepositorySummary};
pub use users::{UserRequest, UserSummary};
