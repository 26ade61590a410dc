//! Error types for the joke board

use thiserror::Error;

/// Failure while obtaining jokes from the remote source.
///
/// Any of these aborts the fetch in progress. Duplicates are not errors; they
/// are skipped inside the fetch loop.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The joke API answered with a non-success status
    #[error("Joke API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Malformed joke response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Attempt or time budget ran out before enough unique jokes arrived
    #[error("Gave up after {attempts} requests with {accepted} of {target} unique jokes")]
    Exhausted {
        attempts: u32,
        accepted: usize,
        target: usize,
    },

    /// The caller cancelled the fetch
    #[error("Fetch cancelled with {accepted} of {target} unique jokes")]
    Cancelled { accepted: usize, target: usize },
}

/// Key-value storage backend error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped onto the backend
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Reading the persisted snapshot failed.
///
/// `JokeStore::load` treats every variant as "no snapshot".
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot unreadable: {0}")]
    Storage(#[from] StorageError),

    #[error("Snapshot malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Writing the snapshot failed
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot write failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Snapshot encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
