//! Repository-related data models.

use serde::{Deserialize, Serialize};

/// Entry of the `GET /rest/repositories` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    /// Repository identifier
    #[serde(alias = "id")]
    pub name: String,
    /// Human readable title
    #[serde(default)]
    pub title: String,
    /// Repository URI
    #[serde(default)]
    pub uri: String,
    /// External URL, empty for local repositories
    #[serde(default, alias = "external_url")]
    pub external_url: String,
    /// Repository type, e.g. "graphdb"
    #[serde(rename = "type", default)]
    pub repository_type: String,
    /// Whether the repository lives on this GraphDB instance
    #[serde(default)]
    pub local: bool,
}

/// Response of `GET /rest/repositories/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetail {
    /// Repository identifier
    pub id: String,
    /// Human readable title
    #[serde(default)]
    pub title: String,
    /// Repository type
    #[serde(rename = "type", default)]
    pub repository_type: String,
    /// Location of the repository, empty for the local instance
    #[serde(default)]
    pub location: String,
}
