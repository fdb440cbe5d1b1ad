//! Transitive dependency discovery and cache-aware artifact download.
//!
//! The fetcher borrows a [`MavenRepository`] and walks the POM graph of every
//! root dependency, then downloads the mediated plan into a local cache
//! directory. Individual failures never abort a run: they are handed to the
//! [`MessageReporter`] and surface as missing entries in the result.

use crate::cache::{CacheEntry, same_digest, sha512_hex_blocking};
use crate::config::{FetchOptions, MavenRepository};
use crate::error::{MavenError, Result};
use crate::parser::parse_pom_bytes;
use crate::repository::Repository;
use crate::types::Dependency;
use futures::StreamExt;
use mvnfetch_core::{MessageReporter, TracingReporter, Transport, TransportError};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One slot of a download run: the planned coordinate and where it landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub dependency: Dependency,
    /// `None` when no repository could provide the artifact.
    pub path: Option<PathBuf>,
}

/// A node being expanded during the depth-first closure walk.
struct Frame {
    dependency: Dependency,
    children: std::vec::IntoIter<Dependency>,
}

pub struct MavenRepositoryFetcher<'a> {
    maven: &'a MavenRepository,
    cache: Repository,
    transport: Arc<dyn Transport>,
    reporter: Arc<dyn MessageReporter>,
    options: FetchOptions,
    cancel: CancellationToken,
}

impl<'a> MavenRepositoryFetcher<'a> {
    /// Creates a fetcher storing artifacts under the local `cache` repository.
    pub fn new(maven: &'a MavenRepository, cache: Repository, transport: Arc<dyn Transport>) -> Self {
        Self {
            maven,
            cache,
            transport,
            reporter: Arc::new(TracingReporter),
            options: FetchOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_message_reporter(mut self, reporter: Arc<dyn MessageReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Once `token` is cancelled no new fetch is started; fetches already in
    /// flight run to completion or time out.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn maven(&self) -> &MavenRepository {
        self.maven
    }

    pub fn cache(&self) -> &Repository {
        &self.cache
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    fn report(&self, message: &str, cause: Option<&MavenError>) {
        self.reporter
            .report(message, cause.map(|e| e as &(dyn std::error::Error + 'static)));
    }

    fn check(&self) -> Result<()> {
        if self.maven.repositories().is_empty() {
            return Err(MavenError::NoRepositories);
        }
        Ok(())
    }

    /// Direct dependencies declared by `dependency`'s POM.
    ///
    /// Classified artifacts have no POM of their own and yield nothing. A POM
    /// that cannot be fetched or parsed is reported and treated as a leaf.
    pub async fn collect_dependencies(&self, dependency: &Dependency) -> Result<Vec<Dependency>> {
        self.check()?;
        if !dependency.classifier().is_empty() {
            return Ok(Vec::new());
        }

        let pom = dependency.pom();
        let path = match self.retrieve(&pom).await {
            Ok(path) => path,
            Err(e) => {
                self.report(&format!("Failed to fetch POM of {}", dependency), Some(&e));
                return Ok(Vec::new());
            }
        };

        let document = match tokio::fs::read(&path)
            .await
            .map_err(MavenError::from)
            .and_then(|data| parse_pom_bytes(&data))
        {
            Ok(document) => document,
            Err(e) => {
                self.report(
                    &format!("Failed to parse pom from {}", path.display()),
                    Some(&e),
                );
                return Ok(Vec::new());
            }
        };

        let dependencies = document.resolved_dependencies();
        tracing::debug!(
            "{} declares {} transitive dependencies",
            dependency,
            dependencies.len()
        );
        Ok(dependencies)
    }

    /// Every dependency reachable from `dependency`, excluding itself unless
    /// it is part of a cycle.
    ///
    /// The walk is depth-first with an explicit stack. A coordinate already
    /// expanded is not descended into again; reaching a coordinate that is on
    /// the current path reports a [`MavenError::CyclicDependency`] and the
    /// walk carries on.
    pub async fn collect_all_dependencies(
        &self,
        dependency: &Dependency,
    ) -> Result<BTreeSet<Dependency>> {
        let mut closure = BTreeSet::new();
        let mut visited: HashSet<Dependency> = HashSet::from([dependency.clone()]);
        let mut on_path: HashSet<Dependency> = HashSet::from([dependency.clone()]);
        let mut stack = vec![Frame {
            dependency: dependency.clone(),
            children: self.collect_dependencies(dependency).await?.into_iter(),
        }];

        loop {
            if self.cancel.is_cancelled() {
                self.report(
                    &format!("Dependency discovery for {} cancelled", dependency),
                    Some(&MavenError::Cancelled),
                );
                break;
            }

            let Some(frame) = stack.last_mut() else {
                break;
            };
            let Some(child) = frame.children.next() else {
                if let Some(done) = stack.pop() {
                    on_path.remove(&done.dependency);
                }
                continue;
            };

            closure.insert(child.clone());

            if on_path.contains(&child) {
                let chain = stack
                    .iter()
                    .map(|f| f.dependency.to_string())
                    .chain(std::iter::once(child.to_string()))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                let err = MavenError::CyclicDependency { chain };
                self.report("Skipping cyclic dependency", Some(&err));
                continue;
            }
            if !visited.insert(child.clone()) {
                continue;
            }

            let children = self.collect_dependencies(&child).await?;
            on_path.insert(child.clone());
            stack.push(Frame {
                dependency: child,
                children: children.into_iter(),
            });
        }

        Ok(closure)
    }

    /// The mediated set of coordinates to download, in
    /// `group:artifact:version` order.
    ///
    /// Transitive coordinates matching an exclusion, or naming the same
    /// artifact as a root dependency, are dropped. The roots themselves are
    /// always planned.
    pub async fn plan_download_set(&self) -> Result<BTreeSet<Dependency>> {
        self.check()?;

        let mut plan = BTreeSet::new();
        for root in self.maven.dependencies() {
            plan.extend(self.collect_all_dependencies(root).await?);
        }

        plan.retain(|dep| !self.maven.is_excluded(dep) && !self.maven.is_root_artifact(dep));
        plan.extend(self.maven.dependencies().iter().cloned());

        tracing::debug!("planned {} artifacts", plan.len());
        Ok(plan)
    }

    /// Downloads `dependency` into the cache and returns its local path.
    pub async fn download_file(&self, dependency: &Dependency) -> Result<PathBuf> {
        self.check()?;
        self.retrieve(dependency).await.inspect_err(|e| {
            self.report(&format!("Failed to download dependency {}", dependency), Some(e));
        })
    }

    /// Plans and downloads every dependency, at most
    /// [`FetchOptions::concurrency`] at a time.
    ///
    /// The result holds one slot per planned coordinate, in plan order.
    pub async fn download_all_dependencies(&self) -> Result<Vec<DownloadedArtifact>> {
        let plan = self.plan_download_set().await?;

        let artifacts = futures::stream::iter(plan)
            .map(|dependency| async move {
                let path = self.download_file(&dependency).await.ok();
                DownloadedArtifact { dependency, path }
            })
            .buffered(self.options.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let missing = artifacts.iter().filter(|a| a.path.is_none()).count();
        if missing > 0 {
            tracing::warn!("{} of {} artifacts unavailable", missing, artifacts.len());
        }
        Ok(artifacts)
    }

    /// Makes `target` available in the cache.
    ///
    /// A fresh cache entry is trusted as long as it has no expected digest or
    /// its bytes match the digest. A fresh entry whose file is missing means
    /// an earlier attempt failed recently and yields
    /// [`MavenError::Unavailable`] without touching the network. Otherwise
    /// repositories are tried in order; bytes failing the digest are never
    /// written. Cancellation between attempts clears the marker stamped for
    /// this run, so an interrupted entry is retried next time.
    async fn retrieve(&self, target: &Dependency) -> Result<PathBuf> {
        if self.cancel.is_cancelled() {
            return Err(MavenError::Cancelled);
        }

        let entry = CacheEntry::new(self.cache.resolve_path(target));
        entry.ensure_parent().await?;

        let fresh = entry.check_freshness(self.options.freshness_window).await;
        match target.sha512() {
            Some(expected) => {
                if entry.matches_digest(expected).await {
                    tracing::debug!("cache hit for {} (digest verified)", target);
                    return Ok(entry.path().to_path_buf());
                }
            }
            None if fresh => {
                if entry.exists().await {
                    tracing::debug!("cache hit for {}", target);
                    return Ok(entry.path().to_path_buf());
                }
                return Err(MavenError::Unavailable {
                    dependency: target.to_string(),
                    path: entry.path().to_path_buf(),
                });
            }
            None => {}
        }

        let mut last_error = None;
        for repository in self.maven.repositories() {
            if self.cancel.is_cancelled() {
                if !fresh && let Err(e) = entry.clear_marker().await {
                    tracing::warn!("failed to clear {}: {}", entry.marker_path().display(), e);
                }
                return Err(MavenError::Cancelled);
            }

            let address = repository.resolve(target);
            self.report(
                &format!("Downloading {} from {}", address, repository.name()),
                None,
            );

            let data = match self.fetch(repository, &address).await {
                Ok(data) => data,
                Err(e) if e.is_not_found() => {
                    self.report(
                        &format!("{} not found in {}", address, repository.name()),
                        None,
                    );
                    last_error = Some(e);
                    continue;
                }
                Err(e) => {
                    self.report(
                        &format!("Failed to fetch {} from {}", address, repository.name()),
                        Some(&e),
                    );
                    last_error = Some(e);
                    continue;
                }
            };

            if let Some(expected) = target.sha512() {
                let actual = sha512_hex_blocking(data.clone()).await?;
                if !same_digest(&actual, expected) {
                    let err = MavenError::DigestMismatch {
                        location: address.clone(),
                        expected: expected.to_string(),
                        actual,
                    };
                    self.report(&format!("Failed to verify {}", address), Some(&err));
                    last_error = Some(err);
                    continue;
                }
            }

            entry.store(data).await?;
            self.report(
                &format!("Downloaded {} from {}", address, repository.name()),
                None,
            );
            return Ok(entry.path().to_path_buf());
        }

        Err(MavenError::Fetch {
            dependency: target.to_string(),
            source: Box::new(last_error.unwrap_or(MavenError::NoRepositories)),
        })
    }

    async fn fetch(&self, repository: &Repository, address: &str) -> Result<bytes::Bytes> {
        let timeout = self.options.fetch_timeout;
        match tokio::time::timeout(
            timeout,
            self.transport.fetch_bytes(address, repository.is_local()),
        )
        .await
        {
            Ok(result) => result.map_err(|e| MavenError::transport(repository.name(), e)),
            Err(_) => Err(MavenError::transport(
                repository.name(),
                TransportError::Timeout {
                    location: address.to_string(),
                    timeout,
                },
            )),
        }
    }
}
