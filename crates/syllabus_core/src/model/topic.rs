//! Topic records and the topic/week search projection.

use crate::model::week::WeekNumber;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-generated identifier of a topic.
pub type TopicId = Uuid;

/// Persisted `topics` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    pub week_number: WeekNumber,
}

/// Fields to overwrite on an existing topic; `None` keeps the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<WeekNumber>,
}

impl TopicPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.week_number.is_none()
    }
}

/// Topic row joined with the name of its week.
///
/// `week_name` is `None` when the referenced week row is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicWithWeek {
    pub id: TopicId,
    pub name: String,
    pub week_number: WeekNumber,
    pub week_name: Option<String>,
}
