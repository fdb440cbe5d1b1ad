//! Artifact sources: remote Maven repositories and local directories.

use crate::error::Result;
use crate::types::Dependency;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Base URL of Maven Central.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2/";
pub const MAVEN_CENTRAL_NAME: &str = "central";
pub const MAVEN_LOCAL_NAME: &str = "local";

/// A named location artifacts can be fetched from.
///
/// The base always ends with the separator used to join resolved paths:
/// `/` for remote repositories, the platform separator for local ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    name: String,
    base: String,
    is_local: bool,
}

impl Repository {
    /// A directory on the local filesystem, made absolute.
    pub fn local(name: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        let mut base = absolute.to_string_lossy().into_owned();
        if !base.ends_with(MAIN_SEPARATOR) {
            base.push(MAIN_SEPARATOR);
        }
        Self {
            name: name.into(),
            base,
            is_local: true,
        }
    }

    /// The user's `~/.m2/repository`, if a home directory is known.
    pub fn maven_local() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::local(
            MAVEN_LOCAL_NAME,
            home.join(".m2").join("repository"),
        ))
    }

    pub fn maven_central() -> Self {
        Self::remote(MAVEN_CENTRAL_NAME, MAVEN_CENTRAL_URL)
    }

    /// A remote repository rooted at `url`.
    pub fn remote(name: impl Into<String>, url: impl Into<String>) -> Self {
        let mut base = url.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            name: name.into(),
            base,
            is_local: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    fn separator(&self) -> char {
        if self.is_local { MAIN_SEPARATOR } else { '/' }
    }

    /// Address of `dependency` inside this repository, following the
    /// standard `group/artifact/version/file` layout.
    pub fn resolve(&self, dependency: &Dependency) -> String {
        let sep = self.separator();
        let mut address = String::with_capacity(self.base.len() + 64);
        address.push_str(&self.base);
        address.extend(
            dependency
                .group_id()
                .chars()
                .map(|c| if c == '.' { sep } else { c }),
        );
        for segment in [dependency.artifact_id(), dependency.version()] {
            address.push(sep);
            address.push_str(segment);
        }
        address.push(sep);
        address.push_str(&dependency.file_name());
        address
    }

    /// Like [`resolve`](Self::resolve), as a filesystem path.
    pub fn resolve_path(&self, dependency: &Dependency) -> PathBuf {
        PathBuf::from(self.resolve(dependency))
    }

    /// Resolves a `group:artifact:version[:type[:classifier]]` notation.
    pub fn resolve_notation(&self, notation: &str) -> Result<String> {
        Ok(self.resolve(&Dependency::parse(notation)?))
    }
}
