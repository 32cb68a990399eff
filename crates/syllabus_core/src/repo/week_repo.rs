//! Week repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert and list rows of the `weeks` table.
//!
//! # Invariants
//! - `number` is caller supplied and unique; duplicates fail in the store.
//! - `insert_weeks` runs in one transaction, so a failing row leaves the
//!   table exactly as it was.
//! - `find_all_weeks` returns rows in primary-key order.

use crate::model::instructor::InstructorId;
use crate::model::week::{NewWeek, Week, WeekNumber};
use crate::repo::{begin_write, insert_one, parse_uuid, query_all, RepoResult};
use rusqlite::{params, Connection, Row};

pub const TABLE_NAME: &str = "weeks";

const INSERT_SQL: &str = "INSERT INTO weeks (number, name, instructor_id)
VALUES (?1, ?2, ?3)
RETURNING number, name, instructor_id;";

/// Repository interface for week persistence.
pub trait WeekRepository {
    fn insert_week(
        &self,
        number: WeekNumber,
        name: &str,
        instructor_id: Option<InstructorId>,
    ) -> RepoResult<Week>;
    fn insert_weeks(&self, weeks: &[NewWeek]) -> RepoResult<Vec<Week>>;
    fn find_all_weeks(&self) -> RepoResult<Vec<Week>>;
}

/// SQLite-backed week repository.
pub struct SqliteWeekRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWeekRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WeekRepository for SqliteWeekRepository<'_> {
    fn insert_week(
        &self,
        number: WeekNumber,
        name: &str,
        instructor_id: Option<InstructorId>,
    ) -> RepoResult<Week> {
        insert_one(
            self.conn,
            INSERT_SQL,
            params![number, name, instructor_id.map(|id| id.to_string())],
            parse_week_row,
        )
    }

    fn insert_weeks(&self, weeks: &[NewWeek]) -> RepoResult<Vec<Week>> {
        if weeks.is_empty() {
            return Ok(Vec::new());
        }

        let tx = begin_write(self.conn)?;
        let mut inserted = Vec::with_capacity(weeks.len());
        for week in weeks {
            inserted.push(insert_one(
                &tx,
                INSERT_SQL,
                params![
                    week.number,
                    week.name,
                    week.instructor_id.map(|id| id.to_string())
                ],
                parse_week_row,
            )?);
        }
        tx.commit()?;

        Ok(inserted)
    }

    fn find_all_weeks(&self) -> RepoResult<Vec<Week>> {
        query_all(
            self.conn,
            "SELECT number, name, instructor_id FROM weeks ORDER BY number ASC;",
            [],
            parse_week_row,
        )
    }
}

fn parse_week_row(row: &Row<'_>) -> RepoResult<Week> {
    let instructor_id = match row.get::<_, Option<String>>("instructor_id")? {
        Some(value) => Some(parse_uuid(&value, "weeks.instructor_id")?),
        None => None,
    };

    Ok(Week {
        number: row.get("number")?,
        name: row.get("name")?,
        instructor_id,
    })
}
