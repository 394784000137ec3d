// Missing assignment records derived from the missing_submissions endpoint
use crate::domain::errors::CanvasResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat record exposed as a sensor attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingAssignment {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub locks_at: Option<String>,
    pub course: String,
    pub course_og_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAssignment {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_at: Option<String>,
    #[serde(default)]
    lock_at: Option<String>,
    course: RawAssignmentCourse,
}

#[derive(Debug, Deserialize)]
struct RawAssignmentCourse {
    name: String,
    #[serde(default)]
    original_name: Option<String>,
}

impl From<RawAssignment> for MissingAssignment {
    fn from(raw: RawAssignment) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            due_date: raw.due_at,
            locks_at: raw.lock_at,
            course: raw.course.name,
            course_og_name: raw.course.original_name,
        }
    }
}

/// Map a raw missing_submissions payload, preserving order
pub fn map_missing_assignments(payload: Value) -> CanvasResult<Vec<MissingAssignment>> {
    let raw: Vec<RawAssignment> = serde_json::from_value(payload)?;
    Ok(raw.into_iter().map(MissingAssignment::from).collect())
}
