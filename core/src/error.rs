use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the record store.
///
/// Nothing here is retried. Every variant is terminal for the action that
/// triggered it and is meant to be shown to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file exists but is not a valid document.
    #[error("store file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read store file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the store failed. In-memory state has been rolled back.
    #[error("failed to write store file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A field was malformed or out of range on create.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl StoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
