// Active course records derived from the courses endpoint
use crate::domain::errors::CanvasResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat record exposed as a sensor attribute
///
/// Attribute keys `friendlyName` and `calendar_ics` are kept stable for
/// dashboards already built on them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: u64,
    pub name: String,
    #[serde(rename = "friendlyName")]
    pub friendly_name: Option<String>,
    pub syllabus: Option<String>,
    /// Display name of the first listed teacher, if any
    pub teacher: Option<String>,
    #[serde(rename = "calendar_ics")]
    pub calendar_ics_url: Option<String>,
    pub term: Value,
}

#[derive(Debug, Deserialize)]
struct RawCourse {
    id: u64,
    name: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    syllabus_body: Option<String>,
    #[serde(default)]
    teachers: Option<Vec<RawTeacher>>,
    #[serde(default)]
    calendar: Option<RawCalendar>,
    #[serde(default)]
    term: Value,
}

#[derive(Debug, Deserialize)]
struct RawTeacher {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    #[serde(default)]
    ics: Option<String>,
}

impl From<RawCourse> for Course {
    fn from(raw: RawCourse) -> Self {
        let teacher = raw
            .teachers
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|t| t.display_name);

        Self {
            id: raw.id,
            name: raw.name,
            friendly_name: raw.friendly_name,
            syllabus: raw.syllabus_body,
            teacher,
            calendar_ics_url: raw.calendar.and_then(|c| c.ics),
            term: raw.term,
        }
    }
}

/// Map a raw courses payload, preserving order
pub fn map_courses(payload: Value) -> CanvasResult<Vec<Course>> {
    let raw: Vec<RawCourse> = serde_json::from_value(payload)?;
    Ok(raw.into_iter().map(Course::from).collect())
}
