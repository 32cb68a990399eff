//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in chronological order.
//! - Apply pending migrations atomically and revert them one step at a time.
//!
//! # Invariants
//! - `version` values are contiguous and monotonic, starting at 1.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Every `down` script exactly undoes its `up` script.
//! - Foreign key enforcement is suspended while scripts run and a clean
//!   `PRAGMA foreign_key_check` is required before commit.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// One schema step identified by a timestamped id.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    /// `YYYYMMDDHHMMSS_description`, sorted chronologically.
    pub id: &'static str,
    up: &'static str,
    down: &'static str,
}

/// Applied/pending view of one registered migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: u32,
    pub id: &'static str,
    pub applied: bool,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        id: "20220905083012_create_weeks_table",
        up: include_str!("20220905083012_create_weeks_table.up.sql"),
        down: include_str!("20220905083012_create_weeks_table.down.sql"),
    },
    Migration {
        version: 2,
        id: "20220912094505_add_topics_table",
        up: include_str!("20220912094505_add_topics_table.up.sql"),
        down: include_str!("20220912094505_add_topics_table.down.sql"),
    },
    Migration {
        version: 3,
        id: "20220914170534_create_instructor_table",
        up: include_str!("20220914170534_create_instructor_table.up.sql"),
        down: include_str!("20220914170534_create_instructor_table.down.sql"),
    },
    Migration {
        version: 4,
        id: "20220916120833_add_instructor_to_weeks",
        up: include_str!("20220916120833_add_instructor_to_weeks.up.sql"),
        down: include_str!("20220916120833_add_instructor_to_weeks.down.sql"),
    },
];

/// Returns every registered migration in apply order.
pub fn migrations() -> &'static [Migration] {
    MIGRATIONS
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Returns the schema version recorded in the database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies all pending migrations on the provided connection.
///
/// Returns the ids of the migrations that ran, oldest first. Pending steps
/// run in one transaction: either all of them land or none do.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<&'static str>> {
    let current = checked_current_version(conn)?;
    if current == latest_version() {
        return Ok(Vec::new());
    }

    let pending: Vec<&'static Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current)
        .collect();

    with_foreign_keys_suspended(conn, |conn| {
        let tx = conn.transaction()?;
        for migration in &pending {
            tx.execute_batch(migration.up)?;
            set_user_version(&tx, migration.version)?;
            ensure_no_foreign_key_violations(&tx, migration.id)?;
        }
        tx.commit()?;
        Ok(())
    })
    .inspect_err(|err| {
        error!(
            "event=migration_apply module=db status=error from_version={current} error={err}"
        );
    })?;

    for migration in &pending {
        info!(
            "event=migration_apply module=db status=ok version={} id={}",
            migration.version, migration.id
        );
    }
    Ok(pending.into_iter().map(|migration| migration.id).collect())
}

/// Reverts the newest applied migration.
///
/// Returns `None` when the schema is already empty.
pub fn rollback_latest(conn: &mut Connection) -> DbResult<Option<&'static str>> {
    let current = checked_current_version(conn)?;
    let Some(index) = MIGRATIONS
        .iter()
        .position(|migration| migration.version == current)
    else {
        return Ok(None);
    };

    let migration = &MIGRATIONS[index];
    let previous_version = index
        .checked_sub(1)
        .map_or(0, |previous| MIGRATIONS[previous].version);

    with_foreign_keys_suspended(conn, |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.down)?;
        set_user_version(&tx, previous_version)?;
        ensure_no_foreign_key_violations(&tx, migration.id)?;
        tx.commit()?;
        Ok(())
    })
    .inspect_err(|err| {
        error!(
            "event=migration_rollback module=db status=error version={} id={} error={err}",
            migration.version, migration.id
        );
    })?;

    info!(
        "event=migration_rollback module=db status=ok version={} id={}",
        migration.version, migration.id
    );
    Ok(Some(migration.id))
}

/// Reverts every applied migration, newest first.
pub fn rollback_all(conn: &mut Connection) -> DbResult<Vec<&'static str>> {
    let mut reverted = Vec::new();
    while let Some(id) = rollback_latest(conn)? {
        reverted.push(id);
    }
    Ok(reverted)
}

/// Reports which registered migrations are applied.
pub fn migration_status(conn: &Connection) -> DbResult<Vec<MigrationStatus>> {
    let current = checked_current_version(conn)?;
    Ok(MIGRATIONS
        .iter()
        .map(|migration| MigrationStatus {
            version: migration.version,
            id: migration.id,
            applied: migration.version <= current,
        })
        .collect())
}

fn checked_current_version(conn: &Connection) -> DbResult<u32> {
    let current = current_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    Ok(current)
}

fn set_user_version(conn: &Connection, version: u32) -> DbResult<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))?;
    Ok(())
}

// `PRAGMA foreign_keys` is a no-op inside a transaction, so the toggle wraps it.
fn with_foreign_keys_suspended<T>(
    conn: &mut Connection,
    step: impl FnOnce(&mut Connection) -> DbResult<T>,
) -> DbResult<T> {
    let enabled: bool = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
    let result = step(conn);
    if enabled {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    }
    result
}

fn ensure_no_foreign_key_violations(conn: &Connection, migration: &'static str) -> DbResult<()> {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check;")?;
    let mut rows = stmt.query([])?;
    let mut violations = 0;
    while rows.next()?.is_some() {
        violations += 1;
    }

    if violations > 0 {
        return Err(DbError::ForeignKeyCheckFailed {
            migration,
            violations,
        });
    }
    Ok(())
}
