//! Domain types for Maven coordinates.

use crate::error::{MavenError, Result};
use std::fmt;
use std::str::FromStr;

/// Packaging used when a coordinate does not name one.
pub const DEFAULT_PACKAGING: &str = "jar";

/// An immutable Maven artifact coordinate plus optional SHA-512 digests.
///
/// Equality, hashing and ordering cover every field, digests included, so
/// two coordinates that differ only by digest are distinct values. Matching
/// "the same artifact" must go through [`Dependency::same_artifact`].
///
/// Ordering is by group, artifact, version, then the remaining fields, which
/// gives download plans a stable `group:artifact:version` order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dependency {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: String,
    packaging: String,
    sha512: Option<String>,
    pom_sha512: Option<String>,
}

impl Dependency {
    /// Creates a `jar` coordinate without classifier or digests.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: String::new(),
            packaging: DEFAULT_PACKAGING.to_string(),
            sha512: None,
            pom_sha512: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into();
        self
    }

    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    /// Expected hex-encoded SHA-512 of the artifact itself.
    pub fn with_sha512(mut self, sha512: Option<String>) -> Self {
        self.sha512 = sha512.map(|s| s.to_ascii_lowercase());
        self
    }

    /// Expected hex-encoded SHA-512 of the artifact's POM.
    pub fn with_pom_sha512(mut self, sha512: Option<String>) -> Self {
        self.pom_sha512 = sha512.map(|s| s.to_ascii_lowercase());
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Classifier without the leading dash, empty when absent.
    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn sha512(&self) -> Option<&str> {
        self.sha512.as_deref()
    }

    pub fn pom_sha512(&self) -> Option<&str> {
        self.pom_sha512.as_deref()
    }

    /// Canonical "{groupId}:{artifactId}" identifier.
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Whether both coordinates name the same group and artifact,
    /// regardless of version, classifier, packaging or digests.
    pub fn same_artifact(&self, other: &Self) -> bool {
        self.matches(&other.group_id, &other.artifact_id)
    }

    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }

    /// The POM describing this artifact.
    ///
    /// The POM digest becomes the artifact digest of the returned
    /// coordinate so that fetching it verifies against the right hash.
    pub fn pom(&self) -> Self {
        Self {
            packaging: "pom".to_string(),
            sha512: self.pom_sha512.clone(),
            ..self.clone()
        }
    }

    /// The same coordinate with `jar` packaging, digests dropped.
    pub fn jar(&self) -> Self {
        Self {
            packaging: DEFAULT_PACKAGING.to_string(),
            ..self.without_digests()
        }
    }

    pub fn without_digests(&self) -> Self {
        Self {
            sha512: None,
            pom_sha512: None,
            ..self.clone()
        }
    }

    /// File name inside the version directory:
    /// `{artifact}-{version}[-{classifier}].{packaging}`.
    pub fn file_name(&self) -> String {
        if self.classifier.is_empty() {
            format!("{}-{}.{}", self.artifact_id, self.version, self.packaging)
        } else {
            format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, self.classifier, self.packaging
            )
        }
    }

    /// Parses `group:artifact:version[:type[:classifier]]`.
    pub fn parse(notation: &str) -> Result<Self> {
        let parts: Vec<&str> = notation.trim().split(':').collect();

        if parts.len() < 3 {
            return Err(MavenError::malformed(
                notation,
                "groupId, artifactId, version are required (groupId:artifactId:version[:type[:classifier]])",
            ));
        }
        if parts.len() > 5 {
            return Err(MavenError::malformed(
                notation,
                format!("expected at most 5 colon-separated parts, got {}", parts.len()),
            ));
        }

        for (label, part) in ["groupId", "artifactId", "version"].iter().zip(&parts) {
            if part.is_empty() {
                return Err(MavenError::malformed(notation, format!("{label} is empty")));
            }
        }

        let mut dep = Self::new(parts[0], parts[1], parts[2]);
        if let Some(packaging) = parts.get(3).filter(|p| !p.is_empty()) {
            dep.packaging = (*packaging).to_string();
        }
        if let Some(classifier) = parts.get(4) {
            dep.classifier = (*classifier).to_string();
        }
        Ok(dep)
    }
}

impl FromStr for Dependency {
    type Err = MavenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Formats the coordinate notation, omitting trailing defaults.
impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}:{}", self.packaging, self.classifier)
        } else if self.packaging != DEFAULT_PACKAGING {
            write!(f, ":{}", self.packaging)
        } else {
            Ok(())
        }
    }
}

/// Dependency scope as declared in a POM.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MavenScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
    System,
    Import,
    Other(String),
}

impl MavenScope {
    /// Whether a declaration with this scope is followed transitively.
    ///
    /// Only `compile` (including an absent scope) and `provided` qualify.
    pub fn is_transitive(&self) -> bool {
        matches!(self, Self::Compile | Self::Provided)
    }
}

impl FromStr for MavenScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "" | "compile" => Self::Compile,
            "test" => Self::Test,
            "runtime" => Self::Runtime,
            "provided" => Self::Provided,
            "system" => Self::System,
            "import" => Self::Import,
            other => Self::Other(other.to_string()),
        })
    }
}
