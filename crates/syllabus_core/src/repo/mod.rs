//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Translate repository calls into parameterized SQL statements.
//! - Decode result rows into typed model records.
//!
//! # Invariants
//! - Repositories hold no state besides the borrowed connection; every read
//!   reflects the store.
//! - Constraint violations raised by SQLite are returned unmodified inside
//!   `RepoError::Db`; there is no local validation layer.
//! - Not-found on update/delete is not an error.

use crate::db::DbError;
use rusqlite::{ffi, Connection, ErrorCode, Params, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod instructor_repo;
pub mod topic_repo;
pub mod week_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error type shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A partial update carried no fields to set.
    EmptyUpdate,
    /// A persisted row could not be decoded into its model type.
    InvalidData(String),
}

/// Kind of store constraint that rejected a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Duplicate primary key or unique column value.
    Unique,
    NotNull,
    ForeignKey,
    Other,
}

impl RepoError {
    /// Classifies a store constraint failure.
    ///
    /// Returns `None` for every error that did not come from a constraint.
    /// The underlying error is left untouched.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        let Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(failure, _))) = self else {
            return None;
        };
        if failure.code != ErrorCode::ConstraintViolation {
            return None;
        }

        Some(match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                ConstraintViolation::Unique
            }
            ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintViolation::NotNull,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintViolation::ForeignKey,
            _ => ConstraintViolation::Other,
        })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyUpdate => write!(f, "update called without any field to set"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptyUpdate => None,
            Self::InvalidData(_) => None,
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

/// Runs a statement and decodes every returned row.
pub(crate) fn query_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    decode: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(decode(row)?);
    }
    Ok(records)
}

/// Opens a write transaction that takes the write lock up front.
pub(crate) fn begin_write(conn: &Connection) -> RepoResult<Transaction<'_>> {
    Ok(Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?)
}

/// Runs an `INSERT ... RETURNING` statement and decodes the single row.
pub(crate) fn insert_one<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    decode: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let mut stmt = conn.prepare_cached(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => decode(row),
        None => Err(RepoError::InvalidData(
            "insert returned no row".to_string(),
        )),
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
