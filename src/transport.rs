//! HTTP transport for the GraphDB REST API.
//!
//! Builds authenticated requests, sends them one at a time and turns
//! non-success responses into typed errors. There is no retry logic: every
//! failure goes straight back to the caller.

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::error::Error;

const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP transport bound to one GraphDB server and one set of credentials.
///
/// Holds no per-call state, so one instance can be shared by every resource
/// client.
pub struct HttpTransport {
    base_url: Url,
    username: String,
    password: SecretString,
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the port is 0 or the base URL does not
    /// parse, or an error if the HTTP client cannot be created.
    pub fn new(config: &ConnectionConfig) -> Result<Self, Error> {
        let base_url = config.endpoint()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            base_url,
            username: config.username().to_string(),
            password: SecretString::from(config.password().expose_secret().to_string()),
            client,
        })
    }

    /// Get the base URL, e.g. `http://localhost:7200/rest`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Full URL for `segments` below `/rest/`.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// an identifier stay part of that identifier. An empty last segment
    /// yields a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for a `.` or `..` segment, which URL
    /// normalization would otherwise drop.
    pub fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(Error::Validation(format!(
                "Invalid path segment {dot:?}"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::Configuration(format!("Base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request with Basic credentials attached.
    ///
    /// Empty credentials are still sent.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, Error> {
        Ok(self
            .client
            .request(method, self.url(segments)?)
            .basic_auth(&self.username, Some(self.password.expose_secret())))
    }

    /// Send a request without a body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the server cannot be reached.
    pub async fn send(&self, method: Method, path: &[&str]) -> Result<Response, Error> {
        debug!(%method, ?path, "Sending request");
        let response = self
            .request(method, path)?
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .send()
            .await?;
        debug!(status = response.status().as_u16(), ?path, "Received response");
        Ok(response)
    }

    /// Send a request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the server cannot be reached.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &[&str],
        body: &B,
    ) -> Result<Response, Error> {
        debug!(%method, ?path, "Sending JSON request");
        let response = self
            .request(method, path)?
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(body)
            .send()
            .await?;
        debug!(status = response.status().as_u16(), ?path, "Received response");
        Ok(response)
    }

    /// POST a multipart form holding one text part.
    ///
    /// The part is sent as a file upload named `file_name`, which is how the
    /// server expects configuration documents.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the server cannot be reached.
    pub async fn send_multipart(
        &self,
        path: &[&str],
        field: &'static str,
        file_name: &'static str,
        mime: &str,
        content: String,
    ) -> Result<Response, Error> {
        let part = Part::text(content)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| Error::Validation(format!("Invalid part content type {mime}: {e}")))?;
        let form = Form::new().part(field, part);

        debug!(?path, field, "Sending multipart request");
        let response = self
            .request(Method::POST, path)?
            .multipart(form)
            .send()
            .await?;
        debug!(status = response.status().as_u16(), ?path, "Received response");
        Ok(response)
    }

    /// GET a path and decode its JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` for a non-2xx response and
    /// `Error::Decode` if the body is not the expected JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        let response = self.send(Method::GET, path).await?;
        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        decode_json(response).await
    }
}

/// Check a resource identifier before it becomes a path segment.
///
/// # Errors
///
/// Returns `Error::Validation` for an empty identifier, which would address
/// the whole collection instead of one member.
pub fn identifier<'a>(kind: &str, id: &'a str) -> Result<&'a str, Error> {
    if id.is_empty() {
        return Err(Error::Validation(format!("{kind} identifier must not be empty")));
    }
    Ok(id)
}

/// Decode a JSON response body.
///
/// # Errors
///
/// Returns `Error::Decode` if the body is not valid JSON for `T`.
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(Error::from)
}

/// Succeed only if the response carries exactly `expected`.
///
/// # Errors
///
/// Returns `Error::UnexpectedStatus` carrying the response body otherwise.
pub async fn expect_status(response: Response, expected: StatusCode) -> Result<(), Error> {
    if response.status() == expected {
        return Ok(());
    }
    Err(unexpected_status(response).await)
}

/// Build an `UnexpectedStatus` error from a response, keeping its body verbatim.
pub async fn unexpected_status(response: Response) -> Error {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => Error::UnexpectedStatus { status, body },
        Err(e) => Error::Transport(format!(
            "Failed to read body of HTTP {status} response: {e}"
        )),
    }
}
