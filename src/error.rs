//! Error types for the iBird client library.

use std::fmt;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur when using the iBird client.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A mirror page or payload could not be decoded
    Decode(String),

    /// A composed payload failed validation
    InvalidPayload(String),

    /// A workflow was driven through a transition its state does not allow
    InvalidTransition(String),

    /// Mirror API returned an error status
    Mirror {
        /// HTTP status code from the mirror
        status: u16,
        /// Response body or status text from the mirror
        message: String,
    },

    /// HTTP transport error (when using the mirror client)
    Http(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(msg) => write!(f, "Decode error: {msg}"),
            Error::InvalidPayload(msg) => write!(f, "Invalid payload: {msg}"),
            Error::InvalidTransition(msg) => write!(f, "Invalid transition: {msg}"),
            Error::Mirror { status, message } => write!(f, "Mirror error {status}: {message}"),
            Error::Http(msg) => write!(f, "HTTP error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Decode(err.to_string())
    }
}

#[cfg(feature = "mirror-client")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
