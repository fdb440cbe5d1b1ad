//! Command line front end for the Maven resolver.

pub mod cli;
pub mod config;

use anyhow::{Context, Result};
use config::FetchConfig;
use mvnfetch_core::HttpTransport;
use mvnfetch_maven::DownloadedArtifact;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Marker printed instead of a path for artifacts that could not be fetched.
pub const MISSING: &str = "MISSING";

/// Resolves and downloads everything `config` describes.
///
/// Fails only for configuration problems: a malformed root notation, an
/// invalid exclusion, an empty repository list or an unusable cache
/// directory. Per-artifact failures come back as entries without a path.
pub async fn run(config: &FetchConfig, cancel: CancellationToken) -> Result<Vec<DownloadedArtifact>> {
    let maven = config.to_maven_repository()?;
    let cache_dir = config.cache_dir();
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;

    tracing::info!(
        "resolving {} dependencies from {} repositories into {}",
        maven.dependencies().len(),
        maven.repositories().len(),
        cache_dir.display()
    );

    let transport = HttpTransport::with_options(&config.transport_options())?;
    let fetcher = maven
        .new_fetcher(&cache_dir, Arc::new(transport))
        .with_options(config.fetch_options())
        .with_cancellation(cancel);

    Ok(fetcher.download_all_dependencies().await?)
}

/// `<notation>\t<path>`, or `<notation>\tMISSING`.
pub fn format_line(artifact: &DownloadedArtifact) -> String {
    match &artifact.path {
        Some(path) => format!("{}\t{}", artifact.dependency, path.display()),
        None => format!("{}\t{}", artifact.dependency, MISSING),
    }
}
