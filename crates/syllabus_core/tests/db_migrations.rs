use syllabus_core::db::migrations::{
    apply_migrations, current_version, latest_version, migration_status, migrations,
    rollback_all, rollback_latest,
};
use syllabus_core::db::{connect, open_db, open_db_in_memory, DbError};
use syllabus_core::{DatabaseConfig, SqliteWeekRepository, WeekRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "weeks");
    assert_table_exists(&conn, "topics");
    assert_table_exists(&conn, "instructors");
    assert!(column_names(&conn, "weeks").contains(&"instructor_id".to_string()));
}

#[test]
fn open_db_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syllabus.sqlite3");

    let conn_first = open_db(&path).unwrap();
    SqliteWeekRepository::new(&conn_first)
        .insert_week(1, "Week #1", None)
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_version(&conn_second).unwrap(), latest_version());
    let weeks = SqliteWeekRepository::new(&conn_second).find_all_weeks().unwrap();
    assert_eq!(weeks.len(), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn connect_without_migrations_leaves_schema_empty() {
    let config = DatabaseConfig::in_memory().without_migrations();
    let mut conn = connect(&config).unwrap();
    assert_eq!(current_version(&conn).unwrap(), 0);
    assert_table_missing(&conn, "weeks");

    let applied = apply_migrations(&mut conn).unwrap();
    let expected: Vec<&str> = migrations().iter().map(|migration| migration.id).collect();
    assert_eq!(applied, expected);
    assert!(apply_migrations(&mut conn).unwrap().is_empty());
}

#[test]
fn rollback_all_reverts_every_migration_in_reverse_order() {
    let mut conn = open_db_in_memory().unwrap();

    let reverted = rollback_all(&mut conn).unwrap();
    let mut expected: Vec<&str> = migrations().iter().map(|migration| migration.id).collect();
    expected.reverse();
    assert_eq!(reverted, expected);

    assert_eq!(current_version(&conn).unwrap(), 0);
    for table in ["weeks", "topics", "instructors"] {
        assert_table_missing(&conn, table);
    }
    assert_eq!(rollback_latest(&mut conn).unwrap(), None);
}

#[test]
fn rollback_then_apply_round_trips_the_schema() {
    let mut conn = open_db_in_memory().unwrap();
    let before = schema_sql(&conn);

    rollback_all(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    assert_eq!(schema_sql(&conn), before);
}

#[test]
fn rolling_back_instructor_column_keeps_week_rows() {
    let mut conn = open_db_in_memory().unwrap();
    SqliteWeekRepository::new(&conn)
        .insert_week(1, "Week #1", None)
        .unwrap();

    let reverted = rollback_latest(&mut conn).unwrap();
    assert_eq!(reverted, Some("20220916120833_add_instructor_to_weeks"));
    assert_eq!(column_names(&conn, "weeks"), vec!["number", "name"]);

    let name: String = conn
        .query_row("SELECT name FROM weeks WHERE number = 1;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Week #1");

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1, "foreign keys must be re-enabled after a migration step");
}

#[test]
fn migration_status_reports_applied_prefix() {
    let mut conn = open_db_in_memory().unwrap();
    rollback_latest(&mut conn).unwrap();

    let status = migration_status(&conn).unwrap();
    assert_eq!(status.len(), migrations().len());
    let applied: Vec<bool> = status.iter().map(|entry| entry.applied).collect();
    assert_eq!(applied, vec![true, true, true, false]);
}

fn schema_sql(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT sql FROM sqlite_master WHERE sql IS NOT NULL ORDER BY type, name;")
        .unwrap();
    let sql = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .map(|row| row.unwrap())
        .collect();
    sql
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});")).unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .map(|row| row.unwrap())
        .collect();
    names
}

fn table_exists(conn: &Connection, table_name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert!(table_exists(conn, table_name), "table {table_name} does not exist");
}

fn assert_table_missing(conn: &Connection, table_name: &str) {
    assert!(!table_exists(conn, table_name), "table {table_name} still exists");
}
