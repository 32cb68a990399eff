//! Topic repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert topics for existing weeks, search them by name and apply
//!   partial updates.
//!
//! # Invariants
//! - `week_number` must reference an existing week; the store rejects
//!   orphans with a foreign-key violation.
//! - Search treats the term as a literal substring: `%`, `_` and `\` in the
//!   term match themselves.

use crate::model::topic::{Topic, TopicId, TopicPatch, TopicWithWeek};
use crate::model::week::WeekNumber;
use crate::repo::{insert_one, parse_uuid, query_all, RepoError, RepoResult};
use crate::repo::week_repo::TABLE_NAME as WEEK_TABLE_NAME;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

pub const TABLE_NAME: &str = "topics";

const INSERT_SQL: &str = "INSERT INTO topics (week_number, name)
VALUES (?1, ?2)
RETURNING id, name, week_number;";

const LIKE_ESCAPE: char = '\\';

/// Repository interface for topic persistence and lookup.
pub trait TopicRepository {
    fn insert_for_week(&self, week_number: WeekNumber, topic_name: &str) -> RepoResult<Topic>;
    /// Topics whose name contains `search_term`, joined with their week name.
    fn search_topic_with_week_data(&self, search_term: &str) -> RepoResult<Vec<TopicWithWeek>>;
    /// Returns the updated rows; empty when `id` matches nothing.
    fn update_topic_by_id(&self, id: TopicId, patch: &TopicPatch) -> RepoResult<Vec<Topic>>;
}

/// SQLite-backed topic repository.
pub struct SqliteTopicRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTopicRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TopicRepository for SqliteTopicRepository<'_> {
    fn insert_for_week(&self, week_number: WeekNumber, topic_name: &str) -> RepoResult<Topic> {
        insert_one(
            self.conn,
            INSERT_SQL,
            params![week_number, topic_name],
            parse_topic_row,
        )
    }

    fn search_topic_with_week_data(&self, search_term: &str) -> RepoResult<Vec<TopicWithWeek>> {
        let sql = format!(
            "SELECT
                {TABLE_NAME}.id AS id,
                {TABLE_NAME}.name AS name,
                {TABLE_NAME}.week_number AS week_number,
                {WEEK_TABLE_NAME}.name AS week_name
             FROM {TABLE_NAME}
             LEFT JOIN {WEEK_TABLE_NAME}
               ON {TABLE_NAME}.week_number = {WEEK_TABLE_NAME}.number
             WHERE {TABLE_NAME}.name LIKE ?1 ESCAPE '{LIKE_ESCAPE}'
             ORDER BY {TABLE_NAME}.rowid ASC;"
        );
        let pattern = format!("%{}%", escape_like(search_term));
        query_all(self.conn, &sql, [pattern], parse_topic_with_week_row)
    }

    fn update_topic_by_id(&self, id: TopicId, patch: &TopicPatch) -> RepoResult<Vec<Topic>> {
        if patch.is_empty() {
            return Err(RepoError::EmptyUpdate);
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(name) = patch.name.as_ref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(week_number) = patch.week_number {
            assignments.push("week_number = ?");
            bind_values.push(Value::Integer(week_number));
        }
        bind_values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE topics SET {} WHERE id = ? RETURNING id, name, week_number;",
            assignments.join(", ")
        );
        query_all(self.conn, &sql, params_from_iter(bind_values), parse_topic_row)
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn parse_topic_row(row: &Row<'_>) -> RepoResult<Topic> {
    let id_text: String = row.get("id")?;
    Ok(Topic {
        id: parse_uuid(&id_text, "topics.id")?,
        name: row.get("name")?,
        week_number: row.get("week_number")?,
    })
}

fn parse_topic_with_week_row(row: &Row<'_>) -> RepoResult<TopicWithWeek> {
    let id_text: String = row.get("id")?;
    Ok(TopicWithWeek {
        id: parse_uuid(&id_text, "topics.id")?,
        name: row.get("name")?,
        week_number: row.get("week_number")?,
        week_name: row.get("week_name")?,
    })
}
