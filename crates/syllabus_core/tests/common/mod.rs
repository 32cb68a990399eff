#![allow(dead_code)]

use regex::Regex;
use rusqlite::Connection;

const UUID_PATTERN: &str =
    r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

/// Asserts the canonical 36-character hyphenated form of a generated id.
pub fn assert_canonical_uuid(value: &str) {
    let pattern = Regex::new(UUID_PATTERN).unwrap();
    assert_eq!(value.len(), 36, "uuid `{value}` must be 36 characters long");
    assert!(pattern.is_match(value), "uuid `{value}` is not in canonical form");
}

pub fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// Id column values exactly as stored, bypassing `Uuid` parsing.
pub fn stored_ids(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn.prepare(&format!("SELECT id FROM {table};")).unwrap();
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .map(|row| row.unwrap())
        .collect();
    ids
}
