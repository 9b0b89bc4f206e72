//! `graphdb_repository` resource.
//!
//! Repositories are immutable once created: the only transitions are
//! create and delete.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Resource;
use crate::client::GraphDbApi;
use crate::error::Error;
use crate::types::RepositoryDetail;

/// Desired repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository identifier; must match the `repositoryID` in `config`
    pub name: String,
    /// Repository configuration document in Turtle syntax
    pub config: String,
}

/// Observed repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub repository_type: String,
}

impl From<RepositoryDetail> for RepositoryState {
    fn from(repo: RepositoryDetail) -> Self {
        Self {
            name: repo.id.clone(),
            id: repo.id,
            description: repo.title,
            location: repo.location,
            repository_type: repo.repository_type,
        }
    }
}

/// Reconciler for GraphDB repositories.
pub struct RepositoryResource {
    client: Arc<dyn GraphDbApi>,
}

impl RepositoryResource {
    /// Create a repository resource over a shared client.
    pub fn new(client: Arc<dyn GraphDbApi>) -> Self {
        Self { client }
    }

    fn validate(desired: &RepositoryConfig) -> Result<(), Error> {
        if desired.config.trim().is_empty() {
            return Err(Error::Validation(
                "Config cannot be empty on creation".to_string(),
            ));
        }
        if let Some(declared) = declared_repository_id(&desired.config) {
            if declared != desired.name {
                return Err(Error::Validation(format!(
                    "Config declares repository {declared} but the resource is named {}",
                    desired.name
                )));
            }
        }
        Ok(())
    }
}

/// The `repositoryID` literal declared in a Turtle repository config, if any.
pub(crate) fn declared_repository_id(config: &str) -> Option<&str> {
    let (_, rest) = config.split_once("repositoryID")?;
    let rest = rest.trim_start().strip_prefix('"')?;
    let (id, _) = rest.split_once('"')?;
    Some(id)
}

#[async_trait]
impl Resource for RepositoryResource {
    type Config = RepositoryConfig;
    type State = RepositoryState;

    fn type_name(&self) -> &'static str {
        "graphdb_repository"
    }

    async fn create(&self, desired: &RepositoryConfig) -> Result<RepositoryState, Error> {
        let name = desired.name.as_str();
        Self::validate(desired).map_err(|e| e.context("create repository", name))?;

        debug!(name, "Creating repository");
        self.client
            .create_repository(&desired.config)
            .await
            .map_err(|e| e.context("create repository", name))?;

        // The create call returns nothing, so read back by the configured name.
        let repo = self
            .client
            .get_repository(name)
            .await
            .map_err(|e| e.context("read repository after creation", name))?;
        if repo.id != name {
            return Err(Error::Validation(format!(
                "Server returned repository {} after creating {name}",
                repo.id
            ))
            .context("create repository", name));
        }

        info!(name, "Created repository");
        Ok(repo.into())
    }

    async fn read(&self, id: &str) -> Result<Option<RepositoryState>, Error> {
        debug!(id, "Fetching repository");
        let repo = self
            .client
            .get_repository(id)
            .await
            .map_err(|e| e.context("read repository", id))?;
        Ok(Some(repo.into()))
    }

    async fn update(&self, id: &str, _desired: &RepositoryConfig) -> Result<RepositoryState, Error> {
        Err(Error::Unsupported {
            resource: "repository",
            operation: "update",
        }
        .context("update repository", id))
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        debug!(id, "Deleting repository");
        self.client
            .delete_repository(id)
            .await
            .map_err(|e| e.context("delete repository", id))?;
        info!(id, "Deleted repository");
        Ok(())
    }
}
