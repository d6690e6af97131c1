use std::path::PathBuf;
use thiserror::Error;

/// Reasons a cascade description could not be turned into a [`super::Cascade`].
///
/// The lossy loaders log these and fall back to the null cascade.
#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("Failed to read cascade {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to {op} {format} stream: {source}")]
    Compression {
        op: &'static str,
        format: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid compact cascade: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid cascade markup: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Malformed cascade structure: {0}")]
    Structure(String),
}

impl CascadeError {
    pub(crate) fn structure(msg: impl Into<String>) -> Self {
        CascadeError::Structure(msg.into())
    }
}
