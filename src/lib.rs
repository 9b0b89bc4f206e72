//! GraphDB provider for Rust
//!
//! Manages GraphDB repositories and users declaratively over the server's
//! REST API. An orchestration host configures the provider once, then drives
//! each resource through create, read, update and delete.
//!
//! # Quick Start
//!
//! ```rust
//! use graphdb_provider::{authority_to_role, role_to_authority, Role};
//!
//! assert_eq!(role_to_authority("repo-manager"), "ROLE_REPO_MANAGER");
//! assert_eq!(authority_to_role("ROLE_REPO_MANAGER").unwrap(), "repo-manager");
//! assert_eq!(Role::Admin.authority(), "ROLE_ADMIN");
//! ```

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod provider;
pub mod resources;
pub mod role;
pub mod testing;
pub mod transport;
pub mod types;

// Re-exports
pub use client::{GraphDbApi, GraphDbClient};
pub use clients::{RepositoriesClient, UsersClient};
pub use config::{ConnectionConfig, ProviderConfig};
pub use error::Error;
pub use provider::GraphDbProvider;
pub use resources::{
    DataSource, Diagnostic, ImportableResource, Listing, RepositoriesDataSource, RepositoryConfig,
    RepositoryEntry, RepositoryResource, RepositoryState, Resource, UserConfig, UserEntry,
    UserResource, UserState, UsersDataSource,
};
pub use role::{authority_to_role, role_to_authority, Role};
pub use transport::HttpTransport;
pub use types::{RepositoryDetail, RepositorySummary, UserRequest, UserSummary};
