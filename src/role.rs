//! User roles and their server-side authority encoding.
//!
//! GraphDB stores a user's role as a granted authority such as
//! `ROLE_REPO_MANAGER`. Only the first underscore separates the `ROLE`
//! prefix from the role name, and only the first underscore of the name maps
//! back to a hyphen; any further underscores pass through unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Prefix shared by every role authority.
pub const AUTHORITY_PREFIX: &str = "ROLE_";

/// Encode a role name as an authority string.
///
/// `"repo-manager"` becomes `"ROLE_REPO_MANAGER"`.
#[must_use]
pub fn role_to_authority(role: &str) -> String {
    format!(
        "{AUTHORITY_PREFIX}{}",
        role.to_uppercase().replacen('-', "_", 1)
    )
}

/// Decode an authority string into a role name.
///
/// # Errors
///
/// Returns `Error::Validation` if the authority has no underscore.
pub fn authority_to_role(authority: &str) -> Result<String, Error> {
    let Some((_, name)) = authority.split_once('_') else {
        return Err(Error::Validation(format!(
            "Unsupported authority {authority}"
        )));
    };
    Ok(name.to_lowercase().replacen('_', "-", 1))
}

/// Role a GraphDB user can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Read and write access to granted repositories
    User,
    /// Manages repositories
    RepoManager,
    /// Full administrative access
    Admin,
}

impl Role {
    /// Every role, in increasing order of privilege.
    pub const ALL: [Role; 3] = [Role::User, Role::RepoManager, Role::Admin];

    /// The role name as it appears in configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::RepoManager => "repo-manager",
            Self::Admin => "admin",
        }
    }

    /// The authority string the server stores for this role.
    #[must_use]
    pub fn authority(&self) -> String {
        role_to_authority(self.as_str())
    }

    /// Decode a single authority string.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the authority is malformed or names a
    /// role outside the supported set.
    pub fn from_authority(authority: &str) -> Result<Self, Error> {
        let name = authority_to_role(authority)?;
        name.parse().map_err(|_| {
            Error::Validation(format!(
                "Unknown role {name} decoded from authority {authority}"
            ))
        })
    }

    /// Decode a user's role from their granted authorities.
    ///
    /// The first authority is the one that counts.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the list is empty or the first entry
    /// does not decode.
    pub fn from_authorities(authorities: &[String]) -> Result<Self, Error> {
        let first = authorities
            .first()
            .ok_or_else(|| Error::Validation("User has no granted authorities".to_string()))?;
        Self::from_authority(first)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Role must be one of user, repo-manager, admin; got {s}"
                ))
            })
    }
}
