//! Curriculum data-access core.
//!
//! Schema migrations plus thin repositories over the `weeks`, `topics` and
//! `instructors` tables. The SQLite connection is always passed in by the
//! caller and shared between repositories.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{DatabaseConfig, DbLocation};
pub use db::reset::{clear_all, ClearedTable};
pub use db::{connect, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::instructor::{Instructor, InstructorId, InstructorPatch, NewInstructor};
pub use model::topic::{Topic, TopicId, TopicPatch, TopicWithWeek};
pub use model::week::{NewWeek, Week, WeekNumber};
pub use repo::instructor_repo::{InstructorRepository, SqliteInstructorRepository};
pub use repo::topic_repo::{SqliteTopicRepository, TopicRepository};
pub use repo::week_repo::{SqliteWeekRepository, WeekRepository};
pub use repo::{ConstraintViolation, RepoError, RepoResult};
