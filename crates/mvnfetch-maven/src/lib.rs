//! Maven dependency resolution and artifact fetching.
//!
//! This crate models Maven coordinates and repositories, discovers transitive
//! dependencies by reading POMs, mediates the resulting set against the root
//! dependencies and exclusions, and downloads every artifact into a local
//! cache with SHA-512 verification and multi-repository fallback.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod properties;
pub mod repository;
pub mod types;
pub mod version;

#[cfg(test)]
mod test_utils;

pub use cache::{CacheEntry, MARKER_SUFFIX, sha512_hex};
pub use config::{Exclusion, FetchOptions, MavenRepository};
pub use error::{MavenError, Result};
pub use fetcher::{DownloadedArtifact, MavenRepositoryFetcher};
pub use parser::{PomDocument, RawDependency, parse_pom_bytes, parse_pom_xml};
pub use properties::interpolate;
pub use repository::{MAVEN_CENTRAL_NAME, MAVEN_CENTRAL_URL, MAVEN_LOCAL_NAME, Repository};
pub use types::{DEFAULT_PACKAGING, Dependency, MavenScope};
pub use version::simplify_range;
