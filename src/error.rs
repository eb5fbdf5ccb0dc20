use std::path::PathBuf;

use thiserror::Error;

/// A unified error type for manifest generation.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// A candidate file could not be opened or read while hashing it.
    #[error("Unable to read {path:?}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be created, written or flushed.
    #[error("Unable to write manifest {path:?}: {source}")]
    UnwritableOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory exists but its entries could not be listed.
    #[error("Unable to list directory {path:?}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying the fallback file into the input directory failed.
    #[error("Unable to copy fallback file {from:?} to {to:?}: {source}")]
    Fallback {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File persistence error: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
