//! Errors raised while resolving and fetching Maven artifacts.

use mvnfetch_core::TransportError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MavenError {
    #[error("Invalid Maven coordinates '{notation}': {reason}")]
    MalformedCoordinate { notation: String, reason: String },

    #[error("Failed to parse pom.xml: {message}")]
    ParseError { message: String },

    #[error("Repository '{repository}' failed: {source}")]
    Transport {
        repository: String,
        #[source]
        source: TransportError,
    },

    #[error("Checksum mismatch for {location}: expected sha512 {expected}, got {actual}")]
    DigestMismatch {
        location: String,
        expected: String,
        actual: String,
    },

    #[error("Dependency cycle detected: {chain}")]
    CyclicDependency { chain: String },

    #[error("Failed to download {dependency} from any repository")]
    Fetch {
        dependency: String,
        #[source]
        source: Box<MavenError>,
    },

    #[error("{dependency} is not cached at {} and was checked recently; skipping until the marker expires", .path.display())]
    Unavailable { dependency: String, path: PathBuf },

    #[error("Repositories list is empty")]
    NoRepositories,

    #[error("Resolution cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MavenError>;

impl MavenError {
    pub(crate) fn malformed(notation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCoordinate {
            notation: notation.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(repository: impl Into<String>, source: TransportError) -> Self {
        Self::Transport {
            repository: repository.into(),
            source,
        }
    }

    /// Whether a repository reported that the requested file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_not_found())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = MavenError::malformed("badcoords", "expected at least 3 segments");
        assert_eq!(
            err.to_string(),
            "Invalid Maven coordinates 'badcoords': expected at least 3 segments"
        );

        let err = MavenError::NoRepositories;
        assert_eq!(err.to_string(), "Repositories list is empty");
    }

    #[test]
    fn test_digest_mismatch_display() {
        let err = MavenError::DigestMismatch {
            location: "https://r/a.jar".into(),
            expected: "aa".into(),
            actual: "bb".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://r/a.jar"));
        assert!(msg.contains("expected sha512 aa"));
    }

    #[test]
    fn test_fetch_error_keeps_last_cause() {
        let last = MavenError::transport(
            "central",
            TransportError::Status {
                location: "https://r/a.jar".into(),
                status: 404,
            },
        );
        let err = MavenError::Fetch {
            dependency: "a:b:1.0".into(),
            source: Box::new(last),
        };

        assert_eq!(
            err.to_string(),
            "Failed to download a:b:1.0 from any repository"
        );
        let cause = err.source().unwrap().to_string();
        assert!(cause.contains("central"));
    }

    #[test]
    fn test_is_not_found() {
        let missing = MavenError::transport(
            "central",
            TransportError::Status {
                location: "https://r/a.jar".into(),
                status: 404,
            },
        );
        assert!(missing.is_not_found());

        let broken = MavenError::transport(
            "central",
            TransportError::Status {
                location: "https://r/a.jar".into(),
                status: 503,
            },
        );
        assert!(!broken.is_not_found());
        assert!(!MavenError::NoRepositories.is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err: MavenError = io_err.into();
        assert!(matches!(err, MavenError::Io(_)));
    }
}
