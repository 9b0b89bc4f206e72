//! Read-only `graphdb_repositories` and `graphdb_users` data sources.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{DataSource, Diagnostic, Listing};
use crate::client::GraphDbApi;
use crate::error::Error;
use crate::role::Role;
use crate::types::{RepositorySummary, UserSummary};

/// One repository as reported by `graphdb_repositories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub uri: String,
    pub external_url: String,
    #[serde(rename = "type")]
    pub repository_type: String,
    pub local: bool,
}

impl From<RepositorySummary> for RepositoryEntry {
    fn from(repo: RepositorySummary) -> Self {
        Self {
            id: repo.name.clone(),
            name: repo.name,
            description: repo.title,
            uri: repo.uri,
            external_url: repo.external_url,
            repository_type: repo.repository_type,
            local: repo.local,
        }
    }
}

/// One user as reported by `graphdb_users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl TryFrom<&UserSummary> for UserEntry {
    type Error = Error;

    fn try_from(user: &UserSummary) -> Result<Self, Error> {
        let role = Role::from_authorities(&user.granted_authorities)?;
        Ok(Self {
            id: user.username.clone(),
            username: user.username.clone(),
            role,
        })
    }
}

/// Lists every repository on the server.
pub struct RepositoriesDataSource {
    client: Arc<dyn GraphDbApi>,
}

impl RepositoriesDataSource {
    pub fn new(client: Arc<dyn GraphDbApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for RepositoriesDataSource {
    type Entry = RepositoryEntry;

    fn type_name(&self) -> &'static str {
        "graphdb_repositories"
    }

    async fn read_all(&self) -> Result<Listing<RepositoryEntry>, Error> {
        let repositories = self
            .client
            .list_repositories()
            .await
            .map_err(|e| e.context("list", "repositories"))?;
        debug!(count = repositories.len(), "Fetched repositories");

        Ok(Listing {
            items: repositories.into_iter().map(RepositoryEntry::from).collect(),
            diagnostics: Vec::new(),
        })
    }
}

/// Lists every user on the server.
///
/// Users whose role cannot be decoded are skipped and reported as
/// diagnostics instead of failing the whole listing.
pub struct UsersDataSource {
    client: Arc<dyn GraphDbApi>,
}

impl UsersDataSource {
    pub fn new(client: Arc<dyn GraphDbApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for UsersDataSource {
    type Entry = UserEntry;

    fn type_name(&self) -> &'static str {
        "graphdb_users"
    }

    async fn read_all(&self) -> Result<Listing<UserEntry>, Error> {
        let users = self
            .client
            .list_users()
            .await
            .map_err(|e| e.context("list", "users"))?;
        debug!(count = users.len(), "Fetched users");

        let mut listing = Listing::default();
        for user in &users {
            match UserEntry::try_from(user) {
                Ok(entry) => listing.items.push(entry),
                Err(e) => {
                    warn!(username = %user.username, error = %e, "Skipping user with undecodable role");
                    listing.diagnostics.push(Diagnostic {
                        summary: "Failed to retrieve user".to_string(),
                        detail: match user.granted_authorities.first() {
                            Some(authority) => format!(
                                "Unknown role {authority} for user {}: {e}",
                                user.username
                            ),
                            None => format!("User {} has no granted authorities", user.username),
                        },
                    });
                }
            }
        }
        Ok(listing)
    }
}
