//! `graphdb_user` resource.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ImportableResource, Resource};
use crate::client::GraphDbApi;
use crate::error::Error;
use crate::role::Role;
use crate::types::{UserRequest, UserSummary};

/// Desired user.
#[derive(Debug)]
pub struct UserConfig {
    pub username: String,
    /// Write-only; never read back from the server
    pub password: Option<SecretString>,
    pub role: Role,
}

impl UserConfig {
    /// Configuration for `username` with `role` and no password.
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: None,
            role,
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Full-replace request body carrying the single authority for `role`.
    fn to_request(&self) -> UserRequest {
        UserRequest {
            username: self.username.clone(),
            password: self
                .password
                .as_ref()
                .map(|p| p.expose_secret().to_string())
                .unwrap_or_default(),
            granted_authorities: vec![self.role.authority()],
        }
    }
}

/// Observed user. The password is never part of state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl TryFrom<UserSummary> for UserState {
    type Error = Error;

    fn try_from(user: UserSummary) -> Result<Self, Error> {
        let role = Role::from_authorities(&user.granted_authorities)?;
        Ok(Self {
            id: user.username.clone(),
            username: user.username,
            role,
        })
    }
}

/// Reconciler for GraphDB users.
pub struct UserResource {
    client: Arc<dyn GraphDbApi>,
}

impl UserResource {
    /// Create a user resource over a shared client.
    pub fn new(client: Arc<dyn GraphDbApi>) -> Self {
        Self { client }
    }

    /// Fetch and decode a user that is expected to exist.
    async fn fetch(&self, username: &str) -> Result<UserState, Error> {
        let user = self.client.get_user(username).await?;
        UserState::try_from(user)
    }
}

#[async_trait]
impl Resource for UserResource {
    type Config = UserConfig;
    type State = UserState;

    fn type_name(&self) -> &'static str {
        "graphdb_user"
    }

    async fn create(&self, desired: &UserConfig) -> Result<UserState, Error> {
        let username = desired.username.as_str();
        debug!(username, role = %desired.role, "Attempting to create user");

        self.client
            .create_user(&desired.to_request())
            .await
            .map_err(|e| e.context("create user", username))?;

        // The API does not echo the user back.
        let state = self
            .fetch(username)
            .await
            .map_err(|e| e.context("read user after creation", username))?;

        info!(username, "Created user");
        Ok(state)
    }

    async fn read(&self, id: &str) -> Result<Option<UserState>, Error> {
        debug!(username = id, "Reading user");
        match self.fetch(id).await {
            Ok(state) => Ok(Some(state)),
            Err(e) if e.is_not_found() => {
                debug!(username = id, "User no longer exists");
                Ok(None)
            }
            Err(e) => Err(e.context("read user", id)),
        }
    }

    async fn update(&self, id: &str, desired: &UserConfig) -> Result<UserState, Error> {
        if desired.username != id {
            return Err(Error::Validation(format!(
                "Username cannot change from {id} to {}; replace the user instead",
                desired.username
            ))
            .context("update user", id));
        }

        debug!(username = id, role = %desired.role, "Updating user");
        self.client
            .update_user(id, &desired.to_request())
            .await
            .map_err(|e| e.context("update user", id))?;

        let state = self
            .fetch(id)
            .await
            .map_err(|e| e.context("read user after update", id))?;

        info!(username = id, "Updated user");
        Ok(state)
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        debug!(username = id, "Deleting user");
        self.client
            .delete_user(id)
            .await
            .map_err(|e| e.context("delete user", id))?;
        info!(username = id, "Deleted user");
        Ok(())
    }
}

#[async_trait]
impl ImportableResource for UserResource {
    async fn import(&self, id: &str) -> Result<UserState, Error> {
        debug!(username = id, "Importing user");
        let state = self
            .fetch(id)
            .await
            .map_err(|e| e.context("import user", id))?;

        Ok(UserState {
            id: id.to_string(),
            ..state
        })
    }
}
