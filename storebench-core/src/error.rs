use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by either access layer.
///
/// A read-by-id miss is not an error: lookups return `Option` and
/// updates/deletes report a count of 0.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique, foreign-key, not-null or check constraint rejected a write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The database file could not be opened
    #[error("Store unavailable at {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The on-disk schema is newer than this build understands
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },

    /// Any other SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl StoreError {
    pub fn unavailable(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Map an error raised while opening `path`.
    ///
    /// A file that is not a database, or cannot be opened at all, is
    /// `StoreUnavailable`; anything else converts as usual.
    pub fn on_open(path: impl Into<PathBuf>, err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::NotADatabase | rusqlite::ErrorCode::CannotOpen) => {
                Self::unavailable(path, err)
            }
            _ => Self::from(err),
        }
    }

    /// True for `ConstraintViolation`.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(msg.unwrap_or_else(|| e.to_string()))
            }
            other => Self::Sqlite(other),
        }
    }
}
