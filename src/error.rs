//! Error types for the GraphDB provider.

use thiserror::Error;

/// Main error type for the GraphDB provider.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection or network failure; never retried
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Server answered, but not with the expected success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The user does not exist on the server
    #[error("Cannot find user with name: {0}")]
    NotFound(String),

    /// Local precondition failure, detected before or after a remote call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid connection parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Lifecycle transition the resource kind does not support
    #[error("{operation} is not supported for {resource} resources")]
    Unsupported {
        resource: &'static str,
        operation: &'static str,
    },

    /// An error annotated with the lifecycle operation and identifier it came from
    #[error("{operation} {id}: {source}")]
    Operation {
        operation: &'static str,
        id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the operation name and the resource identifier.
    #[must_use]
    pub fn context(self, operation: &'static str, id: impl Into<String>) -> Self {
        Self::Operation {
            operation,
            id: id.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any context layers.
    #[must_use]
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Operation { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Check if the root cause is a missing remote object.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound(_))
    }

    /// HTTP status of an `UnexpectedStatus` root cause.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
