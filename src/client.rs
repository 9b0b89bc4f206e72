//! GraphDB client.
//!
//! [`GraphDbApi`] is the capability the reconcilers depend on. The HTTP
//! implementation is [`GraphDbClient`]; tests can substitute
//! [`crate::testing::MockGraphDb`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::clients::{RepositoriesClient, UsersClient};
use crate::config::ConnectionConfig;
use crate::error::Error;
use crate::transport::HttpTransport;
use crate::types::{RepositoryDetail, RepositorySummary, UserRequest, UserSummary};

/// Administrative operations of a GraphDB server.
#[async_trait]
pub trait GraphDbApi: Send + Sync {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, Error>;

    /// Create a repository from a configuration document passed through verbatim.
    async fn create_repository(&self, config: &str) -> Result<(), Error>;

    async fn get_repository(&self, id: &str) -> Result<RepositoryDetail, Error>;

    async fn delete_repository(&self, id: &str) -> Result<(), Error>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, Error>;

    /// Get one user; a missing user is `Error::NotFound`.
    async fn get_user(&self, username: &str) -> Result<UserSummary, Error>;

    async fn create_user(&self, request: &UserRequest) -> Result<(), Error>;

    async fn update_user(&self, username: &str, request: &UserRequest) -> Result<(), Error>;

    async fn delete_user(&self, username: &str) -> Result<(), Error>;
}

/// Client for one GraphDB server.
///
/// Aggregates the resource clients over a single shared transport.
///
/// # Example
///
/// ```rust,ignore
/// use graphdb_provider::{ConnectionConfig, GraphDbApi, GraphDbClient};
///
/// let config = ConnectionConfig::new("localhost")?
///     .with_username("admin")
///     .with_password("root");
/// let client = GraphDbClient::new(&config)?;
///
/// for repo in client.list_repositories().await? {
///     println!("{} ({})", repo.name, repo.repository_type);
/// }
/// ```
pub struct GraphDbClient {
    transport: Arc<HttpTransport>,
    repositories: RepositoriesClient,
    users: UsersClient,
}

impl GraphDbClient {
    /// Create a new GraphDB client.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for port 0, or an error if the HTTP
    /// transport cannot be created.
    pub fn new(config: &ConnectionConfig) -> Result<Self, Error> {
        let transport = Arc::new(HttpTransport::new(config)?);

        Ok(Self {
            repositories: RepositoriesClient::new(Arc::clone(&transport)),
            users: UsersClient::new(Arc::clone(&transport)),
            transport,
        })
    }

    /// Get the underlying HTTP transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<HttpTransport> {
        &self.transport
    }

    /// Get the repositories client.
    #[must_use]
    pub fn repositories(&self) -> &RepositoriesClient {
        &self.repositories
    }

    /// Get the users client.
    #[must_use]
    pub fn users(&self) -> &UsersClient {
        &self.users
    }
}

#[async_trait]
impl GraphDbApi for GraphDbClient {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, Error> {
        self.repositories.list().await
    }

    async fn create_repository(&self, config: &str) -> Result<(), Error> {
        self.repositories.create(config).await
    }

    async fn get_repository(&self, id: &str) -> Result<RepositoryDetail, Error> {
        self.repositories.get(id).await
    }

    async fn delete_repository(&self, id: &str) -> Result<(), Error> {
        self.repositories.delete(id).await
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, Error> {
        self.users.list().await
    }

    async fn get_user(&self, username: &str) -> Result<UserSummary, Error> {
        self.users.get(username).await
    }

    async fn create_user(&self, request: &UserRequest) -> Result<(), Error> {
        self.users.create(request).await
    }

    async fn update_user(&self, username: &str, request: &UserRequest) -> Result<(), Error> {
        self.users.update(username, request).await
    }

    async fn delete_user(&self, username: &str) -> Result<(), Error> {
        self.users.delete(username).await
    }
}
