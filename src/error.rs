//! Error types.
//!
//! Conversion itself never fails (unknown shapes degrade to `Untranslated`);
//! these cover constructor misuse, persisted data and host graph loading.
use std::path::PathBuf;

use thiserror::Error;

/// Misuse of a type model constructor. A programming error, not a data
/// condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("cannot construct a function with no call signatures")]
    NoCallSignatures,
}

/// Persisted type JSON that does not describe a type.
#[derive(Debug, Error)]
#[error("at JSON path {path} → {message}")]
pub struct DecodeError {
    pub path: String,
    pub message: String,
}

impl DecodeError {
    pub(crate) fn from_path_error(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        DecodeError { path, message: err.into_inner().to_string() }
    }
}

/// Failure loading or validating a host type graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read type graph {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid type graph at JSON path {path} → {message}")]
    Parse { path: String, message: String },
    #[error("{owner} refers to missing {what} #{index}")]
    Dangling {
        owner: String,
        what: &'static str,
        index: u32,
    },
}
