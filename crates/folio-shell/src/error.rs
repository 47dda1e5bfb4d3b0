//! Document load errors.

use std::path::PathBuf;

/// Error loading a document body.
///
/// The shell shows the message inline; nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A compiled document that is not a node array.
    #[error("Invalid compiled document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
    #[error("Invalid front matter: {0}")]
    Metadata(#[from] serde_yaml::Error),
    /// Failure reported by a host-supplied loader.
    #[error("{0}")]
    Failed(String),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}
