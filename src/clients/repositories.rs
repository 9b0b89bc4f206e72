//! Repositories resource client.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::error::Error;
use crate::transport::{expect_status, identifier, HttpTransport};
use crate::types::{RepositoryDetail, RepositorySummary};

const REPOSITORIES: &str = "repositories";

/// Multipart field the server reads the configuration document from.
const CONFIG_FIELD: &str = "config";
const CONFIG_FILE_NAME: &str = "config.ttl";
const TURTLE_MIME: &str = "text/turtle";

/// Client for repository operations.
pub struct RepositoriesClient {
    transport: Arc<HttpTransport>,
}

impl RepositoriesClient {
    /// Create a new repositories client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// List every repository, in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn list(&self) -> Result<Vec<RepositorySummary>, Error> {
        self.transport.get_json(&[REPOSITORIES]).await
    }

    /// Create a repository from a configuration document.
    ///
    /// The document (usually Turtle) is passed through verbatim as the
    /// `config` part of a multipart form.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` unless the server answers 201 Created.
    pub async fn create(&self, config: &str) -> Result<(), Error> {
        let response = self
            .transport
            .send_multipart(
                &[REPOSITORIES],
                CONFIG_FIELD,
                CONFIG_FILE_NAME,
                TURTLE_MIME,
                config.to_string(),
            )
            .await?;
        expect_status(response, StatusCode::CREATED).await
    }

    /// Get a repository by identifier.
    ///
    /// A missing repository is not distinguished from other failures.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is empty, the request fails, the status is
    /// not a success, or the body does not decode.
    pub async fn get(&self, id: &str) -> Result<RepositoryDetail, Error> {
        let id = identifier("Repository", id)?;
        self.transport.get_json(&[REPOSITORIES, id]).await
    }

    /// Delete a repository by identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` unless the server answers 200 OK.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let id = identifier("Repository", id)?;
        let response = self
            .transport
            .send(Method::DELETE, &[REPOSITORIES, id])
            .await?;
        expect_status(response, StatusCode::OK).await
    }
}
