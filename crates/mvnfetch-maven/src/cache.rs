//! On-disk artifact cache entries and their "last checked" markers.
//!
//! Each cached file `F` has a sibling `F.last_checked` holding the Unix time
//! in seconds of the last time the entry was checked against the remote
//! repositories. A marker younger than the freshness window short-circuits
//! any network access for that entry, even when `F` itself is missing.

use bytes::Bytes;
use sha2::{Digest, Sha512};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const MARKER_SUFFIX: &str = ".last_checked";

/// Lowercase hex SHA-512 of `bytes`.
pub fn sha512_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compares a computed digest with an expected one, ignoring case.
pub fn same_digest(actual: &str, expected: &str) -> bool {
    actual.eq_ignore_ascii_case(expected.trim())
}

/// [`sha512_hex`] on the blocking pool, for artifacts too large to hash on
/// an executor thread.
pub async fn sha512_hex_blocking(data: Bytes) -> io::Result<String> {
    tokio::task::spawn_blocking(move || sha512_hex(&data))
        .await
        .map_err(io::Error::other)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    path: PathBuf,
    marker: PathBuf,
}

impl CacheEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut marker = path.clone().into_os_string();
        marker.push(MARKER_SUFFIX);
        Self {
            path,
            marker: PathBuf::from(marker),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn marker_path(&self) -> &Path {
        &self.marker
    }

    /// Creates the directory holding the entry.
    pub async fn ensure_parent(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) => tokio::fs::create_dir_all(parent).await,
            None => Ok(()),
        }
    }

    /// Seconds recorded in the marker, if it exists and parses.
    pub async fn last_checked(&self) -> Option<u64> {
        let text = tokio::fs::read_to_string(&self.marker).await.ok()?;
        text.trim().parse().ok()
    }

    /// Returns `true` when the marker is younger than `window`.
    ///
    /// Otherwise the marker is restamped with the current time before
    /// returning `false`, so a check that then fails to fetch anything still
    /// suppresses retries until the window passes again.
    pub async fn check_freshness(&self, window: Duration) -> bool {
        let now = unix_now();
        if let Some(checked) = self.last_checked().await
            && now.saturating_sub(checked) < window.as_secs()
        {
            return true;
        }

        if let Err(e) = self.touch().await {
            tracing::warn!("failed to stamp {}: {}", self.marker.display(), e);
        }
        false
    }

    /// Writes the current time to the marker.
    pub async fn touch(&self) -> io::Result<()> {
        tokio::fs::write(&self.marker, unix_now().to_string()).await
    }

    /// Deletes the marker, making the entry stale again.
    pub async fn clear_marker(&self) -> io::Result<()> {
        match tokio::fs::remove_file(&self.marker).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Cached bytes, `None` when the file is absent.
    pub async fn read(&self) -> io::Result<Option<Bytes>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether the cached file exists and hashes to `expected`.
    pub async fn matches_digest(&self, expected: &str) -> bool {
        let path = self.path.clone();
        let actual = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut file = std::fs::File::open(&path)?;
            let mut hasher = Sha512::new();
            io::copy(&mut file, &mut hasher)?;
            Ok(hex::encode(hasher.finalize()))
        })
        .await;

        match actual {
            Ok(Ok(actual)) => same_digest(&actual, expected),
            _ => false,
        }
    }

    /// Atomically replaces the cached file with `data` and stamps the marker.
    ///
    /// The bytes go to a temporary file in the same directory which is then
    /// renamed over the entry, so readers never observe a partial file.
    pub async fn store(&self, data: Bytes) -> io::Result<()> {
        self.ensure_parent().await?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let mut tmp = tempfile::Builder::new()
                .prefix(".mvnfetch-")
                .suffix(".part")
                .tempfile_in(dir)?;
            tmp.write_all(&data)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;

        self.touch().await
    }
}
