//! Operator CLI for the curriculum database.
//!
//! # Responsibility
//! - Apply, revert and inspect schema migrations.
//! - Clear every table of a development database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use syllabus_core::db::migrations::{
    apply_migrations, latest_version, migration_status, rollback_all, rollback_latest,
};
use syllabus_core::{clear_all, connect, default_log_level, init_logging, DatabaseConfig, DbLocation};

/// Manage the curriculum database
#[derive(Parser, Debug)]
#[command(name = "syllabus", version)]
#[command(about = "Schema migrations and maintenance for the curriculum database", long_about = None)]
struct Cli {
    /// Database file, or `:memory:`
    #[arg(long, env = "SYLLABUS_DATABASE", default_value = "syllabus.sqlite3", global = true)]
    database: String,

    /// trace|debug|info|warn|error
    #[arg(long, env = "SYLLABUS_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when omitted
    #[arg(long, env = "SYLLABUS_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Schema migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },

    /// Delete every row from topics, weeks and instructors (in that order)
    ClearDatabase,
}

#[derive(Subcommand, Debug)]
enum MigrateAction {
    /// Apply all pending migrations
    Latest,

    /// Revert the newest applied migration
    Rollback {
        /// Revert every applied migration
        #[arg(long)]
        all: bool,
    },

    /// List migrations and whether they are applied
    Status,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let config = DatabaseConfig::new(DbLocation::parse(&cli.database)?).without_migrations();
    let mut conn = connect(&config)
        .with_context(|| format!("failed to open database `{}`", cli.database))?;

    match cli.command {
        Command::Migrate { action } => match action {
            MigrateAction::Latest => {
                let applied = apply_migrations(&mut conn)?;
                if applied.is_empty() {
                    println!("Already up to date (version {}).", latest_version());
                }
                for id in applied {
                    println!("Applied {id}");
                }
            }
            MigrateAction::Rollback { all } => {
                let reverted = if all {
                    rollback_all(&mut conn)?
                } else {
                    rollback_latest(&mut conn)?.into_iter().collect()
                };
                if reverted.is_empty() {
                    println!("Nothing to roll back.");
                }
                for id in reverted {
                    println!("Reverted {id}");
                }
            }
            MigrateAction::Status => {
                for status in migration_status(&conn)? {
                    let mark = if status.applied { "applied" } else { "pending" };
                    println!("{:>3}  {:<8} {}", status.version, mark, status.id);
                }
            }
        },
        Command::ClearDatabase => {
            for cleared in clear_all(&conn)? {
                eprintln!("> Cleared table {} ({} rows)", cleared.table, cleared.removed);
            }
            info!("event=clear_database module=cli status=ok");
        }
    }

    Ok(())
}
