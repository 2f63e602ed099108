//! Snapshot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the full event and symbol collections as JSON blobs under
//!   two fixed keys.
//!
//! # Invariants
//! - Saves overwrite the whole blob; loads replace, never merge.
//! - A missing key loads as an empty collection; a malformed payload is
//!   a `Corrupt` error for the caller to handle.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::event::Event;
use crate::model::symbol::Symbol;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key for the event-collection blob.
pub const EVENTS_KEY: &str = "events";
/// Fixed key for the symbol-collection blob.
pub const SYMBOLS_KEY: &str = "symbols";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A stored payload failed to parse as the expected collection.
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    /// A collection failed to serialize before the write.
    Encode(serde_json::Error),
    /// The connection has not been migrated to the supported schema.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Corrupt { key, source } => {
                write!(f, "corrupt snapshot payload under key `{key}`: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode snapshot payload: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Corrupt { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
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

/// Whole-collection snapshot persistence contract.
pub trait SnapshotRepository {
    fn save_events(&self, events: &[Event]) -> RepoResult<()>;
    fn load_events(&self) -> RepoResult<Vec<Event>>;
    fn save_symbols(&self, symbols: &[Symbol]) -> RepoResult<()>;
    fn load_symbols(&self) -> RepoResult<Vec<Symbol>>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Wraps a migrated connection, rejecting one that has not been
    /// bootstrapped through `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected = latest_version();
        let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual != expected {
            return Err(RepoError::UninitializedConnection {
                expected_version: expected,
                actual_version: actual,
            });
        }
        Ok(Self { conn })
    }

    fn save_blob<T: Serialize>(&self, key: &'static str, value: &T) -> RepoResult<()> {
        let payload = serde_json::to_string(value).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO snapshots (key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }

    fn load_blob<T: DeserializeOwned>(&self, key: &'static str) -> RepoResult<Vec<T>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE key = ?1;",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => {
                serde_json::from_str(&payload).map_err(|source| RepoError::Corrupt { key, source })
            }
            None => Ok(Vec::new()),
        }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn save_events(&self, events: &[Event]) -> RepoResult<()> {
        self.save_blob(EVENTS_KEY, &events)
    }

    fn load_events(&self) -> RepoResult<Vec<Event>> {
        self.load_blob(EVENTS_KEY)
    }

    fn save_symbols(&self, symbols: &[Symbol]) -> RepoResult<()> {
        self.save_blob(SYMBOLS_KEY, &symbols)
    }

    fn load_symbols(&self) -> RepoResult<Vec<Symbol>> {
        self.load_blob(SYMBOLS_KEY)
    }
}
