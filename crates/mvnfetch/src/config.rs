//! JSON configuration file and its merge with command line arguments.
//!
//! Every field is optional. A minimal file only lists dependencies:
//!
//! ```json
//! { "dependencies": ["com.google.guava:guava:33.0.0-jre"] }
//! ```

use crate::cli::Cli;
use anyhow::{Context, Result, bail};
use mvnfetch_core::TransportOptions;
use mvnfetch_maven::{Dependency, FetchOptions, MavenRepository, Repository};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// A repository entry: a bare URL, a named URL, or a named local directory.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RepositoryConfig {
    Url(String),
    Remote { name: String, url: String },
    Local { name: String, path: PathBuf },
}

impl RepositoryConfig {
    pub fn to_repository(&self) -> Repository {
        match self {
            Self::Url(url) => Repository::remote(url.as_str(), url.as_str()),
            Self::Remote { name, url } => Repository::remote(name.as_str(), url.as_str()),
            Self::Local { name, path } => Repository::local(name.as_str(), path),
        }
    }
}

/// A root dependency: plain notation, or notation plus expected digests.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DependencyConfig {
    Notation(String),
    Detailed {
        notation: String,
        #[serde(default)]
        sha512: Option<String>,
        #[serde(default)]
        pom_sha512: Option<String>,
    },
}

impl DependencyConfig {
    pub fn to_dependency(&self) -> Result<Dependency> {
        match self {
            Self::Notation(notation) => Ok(Dependency::parse(notation)?),
            Self::Detailed {
                notation,
                sha512,
                pom_sha512,
            } => Ok(Dependency::parse(notation)?
                .with_sha512(sha512.clone())
                .with_pom_sha512(pom_sha512.clone())),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    pub cache_dir: Option<PathBuf>,
    /// Prepend `~/.m2/repository`.
    pub maven_local: bool,
    /// Append Maven Central.
    pub central: bool,
    pub repositories: Vec<RepositoryConfig>,
    pub dependencies: Vec<DependencyConfig>,
    /// `group:artifact` pairs.
    pub exclude: Vec<String>,
    pub concurrency: usize,
    pub fetch_timeout_secs: u64,
    pub freshness_days: u64,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let fetch = FetchOptions::default();
        let transport = TransportOptions::default();
        Self {
            cache_dir: None,
            maven_local: false,
            central: true,
            repositories: Vec::new(),
            dependencies: Vec::new(),
            exclude: Vec::new(),
            concurrency: fetch.concurrency,
            fetch_timeout_secs: fetch.fetch_timeout.as_secs(),
            freshness_days: fetch.freshness_window.as_secs() / SECONDS_PER_DAY,
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            read_timeout_secs: transport.read_timeout.as_secs(),
        }
    }
}

impl FetchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads the file named by `--config`, if any, and applies the other
    /// flags on top of it.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    /// Flags override scalar settings and extend the lists.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(cache) = &cli.cache {
            self.cache_dir = Some(cache.clone());
        }
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        self.maven_local |= cli.maven_local;
        if cli.no_central {
            self.central = false;
        }
        self.repositories.extend(
            cli.repositories
                .iter()
                .map(|(name, url)| RepositoryConfig::Remote {
                    name: name.clone(),
                    url: url.clone(),
                }),
        );
        self.dependencies.extend(
            cli.coordinates
                .iter()
                .cloned()
                .map(DependencyConfig::Notation),
        );
        self.exclude.extend(cli.excludes.iter().cloned());
    }

    /// Repositories in lookup order: Maven local, configured, Central.
    pub fn repositories(&self) -> Vec<Repository> {
        let mut repositories = Vec::new();
        if self.maven_local {
            match Repository::maven_local() {
                Some(local) => repositories.push(local),
                None => tracing::warn!("no home directory, skipping ~/.m2/repository"),
            }
        }
        repositories.extend(self.repositories.iter().map(RepositoryConfig::to_repository));
        if self.central {
            repositories.push(Repository::maven_central());
        }
        repositories
    }

    pub fn to_maven_repository(&self) -> Result<MavenRepository> {
        let mut maven = MavenRepository::new();
        for repository in self.repositories() {
            maven.add_repository(repository);
        }
        for dependency in &self.dependencies {
            maven.add_dependency(dependency.to_dependency()?);
        }
        for exclude in &self.exclude {
            let Some((group_id, artifact_id)) = exclude.split_once(':') else {
                bail!("Invalid exclusion '{exclude}': expected GROUP:ARTIFACT");
            };
            maven.add_exclude(group_id, artifact_id);
        }
        Ok(maven)
    }

    /// `cache_dir`, else the user cache directory, else `./.mvnfetch`.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|dir| dir.join("mvnfetch"))
                .unwrap_or_else(|| PathBuf::from(".mvnfetch"))
        })
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            concurrency: self.concurrency.max(1),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            freshness_window: Duration::from_secs(self.freshness_days * SECONDS_PER_DAY),
        }
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            ..TransportOptions::default()
        }
    }
}
