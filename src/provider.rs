//! Provider entry point.
//!
//! The host calls [`GraphDbProvider::configure`] once per session. It builds a
//! single client and hands it to every resource and data source.

use std::sync::Arc;

use tracing::info;

use crate::client::{GraphDbApi, GraphDbClient};
use crate::config::{ConnectionConfig, ProviderConfig};
use crate::error::Error;
use crate::resources::{
    RepositoriesDataSource, RepositoryResource, UserResource, UsersDataSource,
};

/// Provider type name; resources are named `graphdb_<kind>`.
pub const PROVIDER_NAME: &str = "graphdb";

/// Configured provider owning the shared client.
///
/// # Example
///
/// ```rust,ignore
/// use graphdb_provider::{GraphDbProvider, ProviderConfig, Resource, Role, UserConfig};
///
/// // host, port and credentials fall back to GRAPHDB_* variables
/// let provider = GraphDbProvider::configure(&ProviderConfig::default())?;
///
/// let user = provider
///     .users()
///     .create(&UserConfig::new("TestUser", Role::User).with_password("SuperSecret"))
///     .await?;
/// assert_eq!(user.role, Role::User);
/// ```
pub struct GraphDbProvider {
    client: Arc<dyn GraphDbApi>,
}

impl GraphDbProvider {
    /// Resolve configuration against the environment and build the client.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the merged configuration is invalid,
    /// or an error if the HTTP client cannot be created.
    pub fn configure(config: &ProviderConfig) -> Result<Self, Error> {
        info!("Initializing GraphDB provider");
        let connection = config.resolve()?;
        Self::connect(&connection)
    }

    /// Build the provider from an already resolved connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn connect(connection: &ConnectionConfig) -> Result<Self, Error> {
        let client = GraphDbClient::new(connection)?;
        info!(
            graphdb_host = connection.host(),
            graphdb_port = connection.port(),
            graphdb_username = connection.username(),
            "Created client"
        );
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Use any implementation of the API, e.g. [`crate::testing::MockGraphDb`].
    pub fn with_client(client: Arc<dyn GraphDbApi>) -> Self {
        Self { client }
    }

    /// Get the shared client.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn GraphDbApi> {
        &self.client
    }

    #[must_use]
    pub fn repositories(&self) -> RepositoryResource {
        RepositoryResource::new(Arc::clone(&self.client))
    }

    #[must_use]
    pub fn users(&self) -> UserResource {
        UserResource::new(Arc::clone(&self.client))
    }

    #[must_use]
    pub fn repositories_data_source(&self) -> RepositoriesDataSource {
        RepositoriesDataSource::new(Arc::clone(&self.client))
    }

    #[must_use]
    pub fn users_data_source(&self) -> UsersDataSource {
        UsersDataSource::new(Arc::clone(&self.client))
    }
}
