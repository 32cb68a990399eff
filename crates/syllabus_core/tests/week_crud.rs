mod common;

use common::row_count;
use rusqlite::ErrorCode;
use std::time::Duration;
use syllabus_core::db::open_db_in_memory;
use syllabus_core::{
    connect, ConstraintViolation, DatabaseConfig, DbError, InstructorRepository, NewWeek,
    RepoError, SqliteInstructorRepository, SqliteWeekRepository, Week, WeekRepository,
};
use uuid::Uuid;

fn week(number: i64, name: &str) -> Week {
    Week {
        number,
        name: name.to_string(),
        instructor_id: None,
    }
}

#[test]
fn insert_week_returns_the_inserted_week() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);

    let inserted = repo.insert_week(1, "Week #1", None).unwrap();
    assert_eq!(inserted, week(1, "Week #1"));
}

#[test]
fn insert_week_is_actually_persisted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);
    repo.insert_week(1, "Week #1", None).unwrap();

    let (number, name): (i64, String) = conn
        .query_row("SELECT number, name FROM weeks WHERE number = 1;", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!((number, name.as_str()), (1, "Week #1"));
}

#[test]
fn insert_week_links_an_existing_instructor() {
    let conn = open_db_in_memory().unwrap();
    let instructor = SqliteInstructorRepository::new(&conn)
        .insert_instructor("Ramesh KC", "Software Engineer I")
        .unwrap();
    let repo = SqliteWeekRepository::new(&conn);

    let inserted = repo.insert_week(2, "Week #2", Some(instructor.id)).unwrap();
    assert_eq!(inserted.instructor_id, Some(instructor.id));
}

#[test]
fn insert_week_with_unknown_instructor_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);

    let err = repo.insert_week(1, "Week #1", Some(Uuid::new_v4())).unwrap_err();
    assert_eq!(err.constraint_violation(), Some(ConstraintViolation::ForeignKey));
    assert_eq!(row_count(&conn, "weeks"), 0);
}

#[test]
fn insert_week_with_existing_number_fails_and_keeps_row_count() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);
    repo.insert_week(2, "Week #2", None).unwrap();

    let err = repo.insert_week(2, "Week #2", None).unwrap_err();
    assert_eq!(err.constraint_violation(), Some(ConstraintViolation::Unique));
    assert_eq!(row_count(&conn, "weeks"), 1);
}

#[test]
fn insert_weeks_returns_the_inserted_weeks_in_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);

    let inserted = repo
        .insert_weeks(&[
            NewWeek::new(3, "Week #3"),
            NewWeek::new(1, "Week #1"),
            NewWeek::new(2, "Week #2"),
        ])
        .unwrap();
    assert_eq!(
        inserted,
        vec![week(3, "Week #3"), week(1, "Week #1"), week(2, "Week #2")]
    );
    assert_eq!(row_count(&conn, "weeks"), 3);
}

#[test]
fn insert_weeks_is_atomic_when_a_number_collides_with_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);
    repo.insert_weeks(&[
        NewWeek::new(1, "Week #1"),
        NewWeek::new(2, "Week #2"),
        NewWeek::new(3, "Week #3"),
    ])
    .unwrap();

    let err = repo
        .insert_weeks(&[NewWeek::new(4, "Week #4"), NewWeek::new(2, "Week #2")])
        .unwrap_err();
    assert_eq!(err.constraint_violation(), Some(ConstraintViolation::Unique));
    assert_eq!(row_count(&conn, "weeks"), 3);
    assert!(!repo
        .find_all_weeks()
        .unwrap()
        .iter()
        .any(|row| row.number == 4));
}

#[test]
fn insert_weeks_is_atomic_when_the_batch_collides_with_itself() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);

    let err = repo
        .insert_weeks(&[NewWeek::new(5, "Week #5"), NewWeek::new(5, "Week #5 again")])
        .unwrap_err();
    assert_eq!(err.constraint_violation(), Some(ConstraintViolation::Unique));
    assert_eq!(row_count(&conn, "weeks"), 0);
}

#[test]
fn failed_batch_leaves_connection_usable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWeekRepository::new(&conn);
    repo.insert_week(1, "Week #1", None).unwrap();
    repo.insert_weeks(&[NewWeek::new(1, "Week #1")]).unwrap_err();

    assert!(conn.is_autocommit());
    repo.insert_weeks(&[NewWeek::new(2, "Week #2")]).unwrap();
    assert_eq!(row_count(&conn, "weeks"), 2);
}

#[test]
fn batch_insert_waits_for_write_lock_before_inserting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syllabus.sqlite3");
    let writer = connect(&DatabaseConfig::file(&path)).unwrap();
    let batcher =
        connect(&DatabaseConfig::file(&path).with_busy_timeout(Duration::from_millis(50))).unwrap();

    writer.execute_batch("BEGIN IMMEDIATE;").unwrap();
    let err = SqliteWeekRepository::new(&batcher)
        .insert_weeks(&[NewWeek::new(1, "Week #1"), NewWeek::new(2, "Week #2")])
        .unwrap_err();
    writer.execute_batch("ROLLBACK;").unwrap();

    match err {
        RepoError::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(failure, _))) => {
            assert_eq!(failure.code, ErrorCode::DatabaseBusy);
        }
        other => panic!("expected a busy error, got {other:?}"),
    }
    assert!(batcher.is_autocommit());
    assert_eq!(row_count(&batcher, "weeks"), 0);

    let inserted = SqliteWeekRepository::new(&batcher)
        .insert_weeks(&[NewWeek::new(1, "Week #1")])
        .unwrap();
    assert_eq!(inserted, vec![week(1, "Week #1")]);
}

#[test]
fn find_all_weeks_returns_all_weeks_by_number() {
    let conn = open_db_in_memory().unwrap();
    let instructor = SqliteInstructorRepository::new(&conn)
        .insert_instructor("Bibek Aryal", "Software Associate")
        .unwrap();
    let repo = SqliteWeekRepository::new(&conn);
    repo.insert_weeks(&[
        NewWeek::new(4, "Week #4"),
        NewWeek::new(2, "Week #2").led_by(instructor.id),
        NewWeek::new(1, "Week #1"),
        NewWeek::new(3, "Week #3"),
    ])
    .unwrap();

    let found = repo.find_all_weeks().unwrap();
    let numbers: Vec<i64> = found.iter().map(|row| row.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(found[1].instructor_id, Some(instructor.id));
    assert_eq!(found[0].instructor_id, None);
}
