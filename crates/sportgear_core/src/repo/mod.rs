//! Persistence layer: named-blob backends and the collection snapshot.
//!
//! # Responsibility
//! - Define the key-value contract the store persists through.
//! - Map the three collections onto their fixed JSON slots.
//!
//! # Invariants
//! - Each collection lives in its own slot and is read/written independently.
//! - Repository APIs report failures; swallowing them is the store's policy.

pub mod kv_repo;
pub mod snapshot_repo;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for slot persistence and decoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Failure reported by a non-SQLite backend.
    Backend(String),
    Serialize {
        slot: &'static str,
        source: serde_json::Error,
    },
    Deserialize {
        slot: &'static str,
        source: serde_json::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "key-value backend failure: {message}"),
            Self::Serialize { slot, source } => {
                write!(f, "failed to encode slot `{slot}`: {source}")
            }
            Self::Deserialize { slot, source } => {
                write!(f, "malformed data in slot `{slot}`: {source}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
            Self::Serialize { source, .. } | Self::Deserialize { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
