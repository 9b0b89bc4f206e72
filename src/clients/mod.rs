//! Resource clients for the GraphDB REST API.

pub mod repositories;
pub mod users;

// Re-exports
pub use repositories::RepositoriesClient;
pub use users::UsersClient;
