//! Core abstractions for mvnfetch.
//!
//! This crate holds the pieces the Maven resolver treats as external
//! collaborators: the byte [`Transport`] used to read repository addresses,
//! the [`TransportError`] it fails with, and the [`MessageReporter`] sink
//! used for progress and non-fatal diagnostics.

pub mod error;
pub mod reporter;
pub mod transport;

pub use error::{Result, TransportError};
pub use reporter::{MessageReporter, TracingReporter};
pub use transport::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, HttpTransport, Transport, TransportOptions,
};
