//! Instructor repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `instructors` table.
//!
//! # Invariants
//! - `id` is always generated by the column default, never bound by callers.
//! - `insert_instructors` is all-or-nothing and preserves input order.
//! - Deleting an instructor still referenced by a week is rejected by the
//!   store with a foreign-key violation.

use crate::model::instructor::{Instructor, InstructorId, InstructorPatch, NewInstructor};
use crate::repo::{begin_write, insert_one, parse_uuid, query_all, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

pub const TABLE_NAME: &str = "instructors";

const INSERT_SQL: &str = "INSERT INTO instructors (name, post)
VALUES (?1, ?2)
RETURNING id, name, post;";

/// Repository interface for instructor persistence.
pub trait InstructorRepository {
    fn insert_instructor(&self, name: &str, post: &str) -> RepoResult<Instructor>;
    fn insert_instructors(&self, instructors: &[NewInstructor]) -> RepoResult<Vec<Instructor>>;
    fn find_all_instructors(&self) -> RepoResult<Vec<Instructor>>;
    /// Returns the updated rows; empty when `id` matches nothing.
    fn update_instructor_by_id(
        &self,
        id: InstructorId,
        patch: &InstructorPatch,
    ) -> RepoResult<Vec<Instructor>>;
    /// Returns how many rows were removed (0 or 1).
    fn delete_instructor_by_id(&self, id: InstructorId) -> RepoResult<usize>;
}

/// SQLite-backed instructor repository.
pub struct SqliteInstructorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInstructorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InstructorRepository for SqliteInstructorRepository<'_> {
    fn insert_instructor(&self, name: &str, post: &str) -> RepoResult<Instructor> {
        insert_one(self.conn, INSERT_SQL, params![name, post], parse_instructor_row)
    }

    fn insert_instructors(&self, instructors: &[NewInstructor]) -> RepoResult<Vec<Instructor>> {
        if instructors.is_empty() {
            return Ok(Vec::new());
        }

        let tx = begin_write(self.conn)?;
        let mut inserted = Vec::with_capacity(instructors.len());
        for instructor in instructors {
            inserted.push(insert_one(
                &tx,
                INSERT_SQL,
                params![instructor.name, instructor.post],
                parse_instructor_row,
            )?);
        }
        tx.commit()?;

        Ok(inserted)
    }

    fn find_all_instructors(&self) -> RepoResult<Vec<Instructor>> {
        query_all(
            self.conn,
            "SELECT id, name, post FROM instructors ORDER BY rowid ASC;",
            [],
            parse_instructor_row,
        )
    }

    fn update_instructor_by_id(
        &self,
        id: InstructorId,
        patch: &InstructorPatch,
    ) -> RepoResult<Vec<Instructor>> {
        if patch.is_empty() {
            return Err(RepoError::EmptyUpdate);
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(name) = patch.name.as_ref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(post) = patch.post.as_ref() {
            assignments.push("post = ?");
            bind_values.push(Value::Text(post.clone()));
        }
        bind_values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE instructors SET {} WHERE id = ? RETURNING id, name, post;",
            assignments.join(", ")
        );
        query_all(
            self.conn,
            &sql,
            params_from_iter(bind_values),
            parse_instructor_row,
        )
    }

    fn delete_instructor_by_id(&self, id: InstructorId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM instructors WHERE id = ?1;", [id.to_string()])?;
        Ok(removed)
    }
}

fn parse_instructor_row(row: &Row<'_>) -> RepoResult<Instructor> {
    let id_text: String = row.get("id")?;
    Ok(Instructor {
        id: parse_uuid(&id_text, "instructors.id")?,
        name: row.get("name")?,
        post: row.get("post")?,
    })
}
