//! Connection configuration for the SQLite store.
//!
//! # Responsibility
//! - Describe where the database lives and how connections are tuned.
//! - Keep configuration values explicit so callers inject them instead of
//!   relying on process-global state.
//!
//! # Invariants
//! - `:memory:` always maps to `DbLocation::Memory`.
//! - A file location is never an empty path.

use crate::db::{DbError, DbResult};
use std::path::PathBuf;
use std::time::Duration;

/// Sentinel accepted by `DbLocation::parse` for in-memory databases.
pub const MEMORY_LOCATION: &str = ":memory:";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Physical location of the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    /// Parses a user-supplied location string.
    ///
    /// # Errors
    /// - Returns `DbError::InvalidConfig` when `value` is blank.
    pub fn parse(value: &str) -> DbResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidConfig(
                "database location cannot be empty".to_string(),
            ));
        }
        if trimmed == MEMORY_LOCATION {
            return Ok(Self::Memory);
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }

    /// Short label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Settings used by `db::connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub location: DbLocation,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Apply pending migrations before handing out the connection.
    pub migrate_on_open: bool,
}

impl DatabaseConfig {
    /// Database at `location` with migrations applied on open.
    pub fn new(location: DbLocation) -> Self {
        Self {
            location,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            migrate_on_open: true,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(DbLocation::File(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::new(DbLocation::Memory)
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Leaves the schema untouched on open; used by migration tooling.
    pub fn without_migrations(mut self) -> Self {
        self.migrate_on_open = false;
        self
    }
}
