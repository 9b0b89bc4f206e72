//! User-related data models.

use serde::{Deserialize, Serialize};

/// Body of user create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: String,
    /// Empty on update leaves the server to decide what an empty password means
    pub password: String,
    pub granted_authorities: Vec<String>,
}

/// User as returned by `GET /rest/security/users[/{username}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    /// Usually blank; the server does not echo stored passwords
    #[serde(default)]
    pub password: String,
    /// First entry determines the user's role
    #[serde(default)]
    pub granted_authorities: Vec<String>,
}
