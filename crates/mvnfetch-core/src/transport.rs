use crate::error::{Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Default connect timeout for remote repositories.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default read timeout for remote repositories.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Reads raw bytes from a repository address.
///
/// Implementors turn an address produced by a repository (either an
/// absolute filesystem path or an absolute URL) into the bytes stored there.
/// A fetch either succeeds with the complete body or fails with a
/// [`TransportError`]; there is no partial success.
///
/// Callers layer fallback, checksum verification and caching on top, so
/// implementations must not retry or cache on their own.
///
/// # Examples
///
/// ```no_run
/// use mvnfetch_core::{HttpTransport, Transport};
///
/// # async fn example() -> mvnfetch_core::Result<()> {
/// let transport = HttpTransport::new()?;
/// let pom = transport
///     .fetch_text(
///         "https://repo.maven.apache.org/maven2/junit/junit/4.13.2/junit-4.13.2.pom",
///         false,
///     )
///     .await?;
/// assert!(pom.contains("<artifactId>junit</artifactId>"));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the complete body stored at `address`.
    ///
    /// `is_local` selects filesystem I/O instead of network I/O.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The local file cannot be read
    /// - The network request fails or times out
    /// - The server answers with a non-2xx status
    async fn fetch_bytes(&self, address: &str, is_local: bool) -> Result<Bytes>;

    /// UTF-8 decoded variant of [`Transport::fetch_bytes`].
    async fn fetch_text(&self, address: &str, is_local: bool) -> Result<String> {
        let bytes = self.fetch_bytes(address, is_local).await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| TransportError::InvalidUtf8 {
            location: address.to_string(),
        })
    }
}

/// Timeouts and identification used by [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: format!("mvnfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transport backed by `reqwest` for URLs and `tokio::fs` for local paths.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport with the default 15s connect and read timeouts.
    pub fn new() -> Result<Self> {
        Self::with_options(&TransportOptions::default())
    }

    pub fn with_options(options: &TransportOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .read_timeout(options.read_timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            read_timeout: options.read_timeout,
        })
    }

    fn map_http_error(&self, location: &str, source: reqwest::Error) -> TransportError {
        if source.is_timeout() {
            TransportError::Timeout {
                location: location.to_string(),
                timeout: self.read_timeout,
            }
        } else {
            TransportError::Http {
                location: location.to_string(),
                source,
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_bytes(&self, address: &str, is_local: bool) -> Result<Bytes> {
        if is_local {
            tracing::trace!("reading local file {}", address);
            return tokio::fs::read(address)
                .await
                .map(Bytes::from)
                .map_err(|source| TransportError::File {
                    location: address.to_string(),
                    source,
                });
        }

        tracing::trace!("GET {}", address);
        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| self.map_http_error(address, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                location: address.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| self.map_http_error(address, e))
    }
}
