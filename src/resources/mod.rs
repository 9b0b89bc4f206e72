//! Declarative resources backed by the GraphDB API.
//!
//! The orchestration host drives these through a plan/apply/destroy cycle:
//! it hands over desired configuration, persists the returned state and
//! calls back with the stored identifier.

pub mod listing;
pub mod repository;
pub mod user;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// Re-exports
pub use listing::{RepositoriesDataSource, RepositoryEntry, UserEntry, UsersDataSource};
pub use repository::{RepositoryConfig, RepositoryResource, RepositoryState};
pub use user::{UserConfig, UserResource, UserState};

/// Lifecycle of one managed object.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Desired configuration supplied by the host.
    type Config: Send + Sync;
    /// Observed state the host persists.
    type State: Send;

    /// Resource type name, e.g. `graphdb_user`.
    fn type_name(&self) -> &'static str;

    /// Create the object and return its observed state.
    async fn create(&self, desired: &Self::Config) -> Result<Self::State, Error>;

    /// Refresh state for `id`. `None` means the object no longer exists.
    async fn read(&self, id: &str) -> Result<Option<Self::State>, Error>;

    /// Bring an existing object in line with `desired`.
    async fn update(&self, id: &str, desired: &Self::Config) -> Result<Self::State, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;
}

/// Resources that can be adopted from an existing remote object.
#[async_trait]
pub trait ImportableResource: Resource {
    /// Build state for an object that exists remotely but not in host state.
    async fn import(&self, id: &str) -> Result<Self::State, Error>;
}

/// Read-only enumeration of remote objects.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Entry: Send;

    /// Data source type name, e.g. `graphdb_users`.
    fn type_name(&self) -> &'static str;

    async fn read_all(&self) -> Result<Listing<Self::Entry>, Error>;
}

/// Problem with a single listing entry that did not stop the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
}

/// Result of a data source read: the entries that mapped cleanly, in server
/// order, plus a diagnostic for each entry that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

impl<T> Listing<T> {
    /// Check if every entry mapped cleanly.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
