//! Bulk table clearing for test and development databases.
//!
//! # Invariants
//! - Tables are cleared children first (`topics`, `weeks`, `instructors`) so
//!   no delete ever trips a foreign key.
//! - There is no production guard; callers decide where this runs.

use super::DbResult;
use crate::repo::{instructor_repo, topic_repo, week_repo};
use log::{error, info};
use rusqlite::Connection;

/// Delete order that respects foreign key direction.
pub const CLEAR_ORDER: [&str; 3] = [
    topic_repo::TABLE_NAME,
    week_repo::TABLE_NAME,
    instructor_repo::TABLE_NAME,
];

/// Rows removed from one table by `clear_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedTable {
    pub table: &'static str,
    pub removed: usize,
}

/// Deletes every row of every table, one statement per table.
///
/// Stops at the first failing table; tables cleared before it stay cleared.
pub fn clear_all(conn: &Connection) -> DbResult<Vec<ClearedTable>> {
    let mut cleared = Vec::with_capacity(CLEAR_ORDER.len());
    for table in CLEAR_ORDER {
        info!("event=table_clear module=db status=start table={table}");
        let removed = conn
            .execute(&format!("DELETE FROM {table};"), [])
            .inspect_err(|err| {
                error!("event=table_clear module=db status=error table={table} error={err}");
            })?;
        info!("event=table_clear module=db status=ok table={table} removed={removed}");
        cleared.push(ClearedTable { table, removed });
    }
    Ok(cleared)
}
