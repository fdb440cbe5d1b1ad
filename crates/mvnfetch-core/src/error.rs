//! Transport-level errors shared by every mvnfetch crate.

use std::time::Duration;
use thiserror::Error;

/// A single failed attempt to read bytes from a repository address.
///
/// Every variant carries the address that failed so that fallback
/// diagnostics can name the exact location without extra context.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP client failed before a response status was available
    /// (DNS, TLS, connection reset, body read).
    #[error("request to {location} failed: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status outside of 2xx.
    #[error("{location} responded with non-2xx status {status}")]
    Status { location: String, status: u16 },

    /// A local repository file could not be read.
    #[error("failed to read {location}: {source}")]
    File {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The fetch did not complete within its deadline.
    #[error("fetching {location} timed out after {timeout:?}")]
    Timeout { location: String, timeout: Duration },

    /// `fetch_text` received bytes that are not valid UTF-8.
    #[error("{location} is not valid UTF-8")]
    InvalidUtf8 { location: String },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// Address this error refers to, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Http { location, .. }
            | Self::Status { location, .. }
            | Self::File { location, .. }
            | Self::Timeout { location, .. }
            | Self::InvalidUtf8 { location } => Some(location),
            Self::Client(_) => None,
        }
    }

    /// Whether the remote reported that the artifact does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 404,
            Self::File { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
