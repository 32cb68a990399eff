//! Week records.
//!
//! A week is a numbered curriculum unit. Its number is chosen by the caller
//! and doubles as the primary key.

use crate::model::instructor::InstructorId;
use serde::{Deserialize, Serialize};

pub type WeekNumber = i64;

/// Persisted `weeks` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub number: WeekNumber,
    pub name: String,
    /// Instructor leading the week, if one is assigned.
    pub instructor_id: Option<InstructorId>,
}

/// Insert input for batch week creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWeek {
    pub number: WeekNumber,
    pub name: String,
    #[serde(default)]
    pub instructor_id: Option<InstructorId>,
}

impl NewWeek {
    pub fn new(number: WeekNumber, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            instructor_id: None,
        }
    }

    pub fn led_by(mut self, instructor_id: InstructorId) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }
}
