use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of the recording loop.
///
/// Unrecognized lines and naming failures are expected steady-state
/// conditions and never surface here.
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("log source {} is unavailable: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize registry: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScribeError {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScribeError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScribeError::Persistence {
            path: path.into(),
            source,
        }
    }
}
