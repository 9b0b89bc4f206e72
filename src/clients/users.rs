//! Users resource client.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::error::Error;
use crate::transport::{decode_json, expect_status, identifier, unexpected_status, HttpTransport};
use crate::types::{UserRequest, UserSummary};

const SECURITY: &str = "security";
const USERS: &str = "users";

/// Client for user management operations.
pub struct UsersClient {
    transport: Arc<HttpTransport>,
}

impl UsersClient {
    /// Create a new users client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    fn user_path(username: &str) -> Result<[&str; 3], Error> {
        Ok([SECURITY, USERS, identifier("User", username)?])
    }

    /// List every user, in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn list(&self) -> Result<Vec<UserSummary>, Error> {
        self.transport.get_json(&[SECURITY, USERS, ""]).await
    }

    /// Get a single user.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the server answers 404, and
    /// `Error::UnexpectedStatus` or `Error::Decode` for other failures.
    pub async fn get(&self, username: &str) -> Result<UserSummary, Error> {
        let response = self
            .transport
            .send(Method::GET, &Self::user_path(username)?)
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound(username.to_string())),
            status if status.is_success() => decode_json(response).await,
            _ => Err(unexpected_status(response).await),
        }
    }

    /// Create a user. The request body names the user as well as the path.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` unless the server answers 201 Created.
    pub async fn create(&self, request: &UserRequest) -> Result<(), Error> {
        let response = self
            .transport
            .send_json(Method::POST, &Self::user_path(&request.username)?, request)
            .await?;
        expect_status(response, StatusCode::CREATED).await
    }

    /// Replace a user's password and authorities.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` unless the server answers 200 OK.
    pub async fn update(&self, username: &str, request: &UserRequest) -> Result<(), Error> {
        let response = self
            .transport
            .send_json(Method::PUT, &Self::user_path(username)?, request)
            .await?;
        expect_status(response, StatusCode::OK).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` unless the server answers 204 No Content.
    pub async fn delete(&self, username: &str) -> Result<(), Error> {
        let response = self
            .transport
            .send(Method::DELETE, &Self::user_path(username)?)
            .await?;
        expect_status(response, StatusCode::NO_CONTENT).await
    }
}
