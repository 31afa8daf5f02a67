//! Failure types. Rejected words are not errors; see [`crate::session::Rejection`].

use derive_more::{Display, Error, From};

/// Backing store failure.
#[derive(Debug, Display, Error, From)]
pub enum StoreError {
    #[display("sqlite: {_0}")]
    Sqlite(rusqlite::Error),
    #[display("io: {_0}")]
    Io(std::io::Error),
}

#[derive(Debug, Display, Error)]
pub enum GameError {
    /// The word list could not be loaded; play is blocked until it is.
    #[display("dictionary unavailable: {reason}")]
    DictionaryUnavailable {
        reason: String,
    },
    /// A read or write against the store failed. After a submission the
    /// in-memory session still holds the result.
    #[display("could not persist '{key}': {source}")]
    PersistenceFailure {
        key: String,
        source: StoreError,
    },
    /// A stored record no longer decodes.
    #[display("corrupt record '{key}': {source}")]
    CorruptRecord {
        key: String,
        source: serde_json::Error,
    },
}

impl GameError {
    pub fn dictionary(reason: impl Into<String>) -> Self {
        Self::DictionaryUnavailable {
            reason: reason.into(),
        }
    }

    pub fn persistence(key: impl Into<String>, source: StoreError) -> Self {
        Self::PersistenceFailure {
            key: key.into(),
            source,
        }
    }
}
