//! In-memory GraphDB for testing.
//!
//! `MockGraphDb` implements [`GraphDbApi`] over plain vectors, answering the
//! way a real server would (201 on create, 404 for unknown objects, blank
//! passwords on read) and recording every call.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::client::GraphDbApi;
use crate::error::Error;
use crate::resources::repository::declared_repository_id;
use crate::types::{RepositoryDetail, RepositorySummary, UserRequest, UserSummary};

/// Record of a method call.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Method name (e.g., "create_user", "get_repository")
    pub method: String,
    /// Arguments passed to the method
    pub args: Vec<String>,
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,
}

impl MockCall {
    /// Create a new mock call record.
    pub fn new(method: &str, args: Vec<String>) -> Self {
        Self {
            method: method.to_string(),
            args,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Default)]
struct MockState {
    repositories: Vec<RepositorySummary>,
    users: Vec<UserSummary>,
    calls: Vec<MockCall>,
    failures: HashMap<String, VecDeque<Error>>,
}

impl MockState {
    fn record_call(&mut self, method: &str, args: Vec<String>) -> Result<(), Error> {
        self.calls.push(MockCall::new(method, args));
        match self.failures.get_mut(method).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn repository(&self, id: &str) -> Option<&RepositorySummary> {
        self.repositories.iter().find(|r| r.name == id)
    }

    fn user_index(&self, username: &str) -> Option<usize> {
        self.users.iter().position(|u| u.username == username)
    }
}

fn not_found(what: &str) -> Error {
    Error::UnexpectedStatus {
        status: 404,
        body: format!("{what} not found"),
    }
}

fn bad_request(message: String) -> Error {
    Error::UnexpectedStatus {
        status: 400,
        body: message,
    }
}

/// The `rdfs:label` literal of a Turtle config, used as the repository title.
fn declared_label(config: &str) -> &str {
    config
        .split_once("rdfs:label")
        .and_then(|(_, rest)| rest.trim_start().strip_prefix('"'))
        .and_then(|rest| rest.split_once('"'))
        .map_or("", |(label, _)| label)
}

/// In-memory stand-in for a GraphDB server.
#[derive(Default)]
pub struct MockGraphDb {
    state: Mutex<MockState>,
}

impl MockGraphDb {
    /// Create an empty server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository as if it had been created out of band.
    pub fn seed_repository(&self, repository: RepositorySummary) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .repositories
            .push(repository);
    }

    /// Add a user as if it had been created out of band.
    pub fn seed_user(&self, user: UserSummary) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .users
            .push(user);
    }

    /// Make the next call to `method` fail with `error`.
    ///
    /// Failures queue up; each is consumed by one call.
    pub fn fail_next(&self, method: &str, error: Error) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .entry(method.to_string())
            .or_default()
            .push_back(error);
    }

    /// Password last stored for `username`, which reads never expose.
    #[must_use]
    pub fn stored_password(&self, username: &str) -> Option<String> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .user_index(username)
            .map(|i| state.users[i].password.clone())
    }

    /// Check if a method was called.
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Get the number of times a method was called.
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    /// Get every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Method names of every recorded call, oldest first.
    #[must_use]
    pub fn call_methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.method).collect()
    }

    /// Reset all recorded calls.
    pub fn reset(&self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clear();
    }
}

#[async_trait]
impl GraphDbApi for MockGraphDb {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("list_repositories", vec![])?;
        Ok(state.repositories.clone())
    }

    async fn create_repository(&self, config: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("create_repository", vec![config.to_string()])?;

        let id = declared_repository_id(config)
            .ok_or_else(|| bad_request("No repository ID specified".to_string()))?;
        if state.repository(id).is_some() {
            return Err(bad_request(format!("Repository {id} already exists.")));
        }

        state.repositories.push(RepositorySummary {
            name: id.to_string(),
            title: declared_label(config).to_string(),
            uri: format!("http://localhost:7200/repositories/{id}"),
            external_url: format!("http://localhost:7200/repositories/{id}"),
            repository_type: "graphdb".to_string(),
            local: true,
        });
        Ok(())
    }

    async fn get_repository(&self, id: &str) -> Result<RepositoryDetail, Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("get_repository", vec![id.to_string()])?;

        let repo = state
            .repository(id)
            .ok_or_else(|| not_found(&format!("Repository {id}")))?;
        Ok(RepositoryDetail {
            id: repo.name.clone(),
            title: repo.title.clone(),
            repository_type: repo.repository_type.clone(),
            location: String::new(),
        })
    }

    async fn delete_repository(&self, id: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("delete_repository", vec![id.to_string()])?;

        let before = state.repositories.len();
        state.repositories.retain(|r| r.name != id);
        if state.repositories.len() == before {
            return Err(not_found(&format!("Repository {id}")));
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("list_users", vec![])?;

        Ok(state
            .users
            .iter()
            .map(|u| UserSummary {
                password: String::new(),
                ..u.clone()
            })
            .collect())
    }

    async fn get_user(&self, username: &str) -> Result<UserSummary, Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("get_user", vec![username.to_string()])?;

        let index = state
            .user_index(username)
            .ok_or_else(|| Error::NotFound(username.to_string()))?;
        Ok(UserSummary {
            password: String::new(),
            ..state.users[index].clone()
        })
    }

    async fn create_user(&self, request: &UserRequest) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("create_user", vec![request.username.clone()])?;

        if state.user_index(&request.username).is_some() {
            return Err(bad_request(format!(
                "User {} already exists.",
                request.username
            )));
        }
        state.users.push(UserSummary {
            username: request.username.clone(),
            password: request.password.clone(),
            granted_authorities: request.granted_authorities.clone(),
        });
        Ok(())
    }

    async fn update_user(&self, username: &str, request: &UserRequest) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("update_user", vec![username.to_string()])?;

        let index = state
            .user_index(username)
            .ok_or_else(|| not_found(&format!("User {username}")))?;
        let user = &mut state.users[index];
        // An empty password leaves the stored one alone.
        if !request.password.is_empty() {
            user.password = request.password.clone();
        }
        user.granted_authorities = request.granted_authorities.clone();
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.record_call("delete_user", vec![username.to_string()])?;

        let index = state
            .user_index(username)
            .ok_or_else(|| not_found(&format!("User {username}")))?;
        state.users.remove(index);
        Ok(())
    }
}
