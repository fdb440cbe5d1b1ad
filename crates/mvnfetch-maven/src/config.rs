//! Resolution configuration: repositories, root dependencies, exclusions.

use crate::fetcher::MavenRepositoryFetcher;
use crate::repository::Repository;
use crate::types::Dependency;
use mvnfetch_core::Transport;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Downloads running at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Upper bound for a single fetch from one repository.
///
/// Stalled connections are already cut by the transport's read timeout; this
/// only catches transfers that trickle forever, so it is sized for large jars
/// on slow links.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// How long a "last checked" marker keeps a cache entry fresh.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Tuning knobs for a fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub concurrency: usize,
    pub fetch_timeout: Duration,
    pub freshness_window: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
        }
    }
}

/// A `group:artifact` pair removed from every download plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn matches(&self, dependency: &Dependency) -> bool {
        dependency.matches(&self.group_id, &self.artifact_id)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// What to resolve and where to look for it.
///
/// Repositories are tried in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MavenRepository {
    repositories: Vec<Repository>,
    dependencies: Vec<Dependency>,
    excludes: Vec<Exclusion>,
}

impl MavenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&mut self, repository: Repository) -> &mut Self {
        self.repositories.push(repository);
        self
    }

    pub fn add_dependency(&mut self, dependency: Dependency) -> &mut Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn add_exclude(
        &mut self,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
    ) -> &mut Self {
        self.excludes.push(Exclusion::new(group_id, artifact_id));
        self
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn excludes(&self) -> &[Exclusion] {
        &self.excludes
    }

    pub fn is_excluded(&self, dependency: &Dependency) -> bool {
        self.excludes.iter().any(|e| e.matches(dependency))
    }

    /// Whether `dependency` names the same artifact as one of the roots.
    pub fn is_root_artifact(&self, dependency: &Dependency) -> bool {
        self.dependencies.iter().any(|d| d.same_artifact(dependency))
    }

    /// A fetcher caching into `save_to`, which is exposed as a local
    /// repository named `cache`.
    pub fn new_fetcher(
        &self,
        save_to: impl AsRef<Path>,
        transport: Arc<dyn Transport>,
    ) -> MavenRepositoryFetcher<'_> {
        MavenRepositoryFetcher::new(self, Repository::local("cache", save_to), transport)
    }
}
