//! Instructor records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-generated identifier of an instructor.
pub type InstructorId = Uuid;

/// Persisted `instructors` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
    /// Role or job title, e.g. `Senior Engineer`.
    pub post: String,
}

/// Insert input for batch instructor creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstructor {
    pub name: String,
    pub post: String,
}

impl NewInstructor {
    pub fn new(name: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            post: post.into(),
        }
    }
}

/// Fields to overwrite on an existing instructor; `None` keeps the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
}

impl InstructorPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.post.is_none()
    }
}
