// In-memory CanvasApi used by coordinator and setup flow tests
use crate::application::canvas_api::CanvasApi;
use crate::domain::assignment::MissingAssignment;
use crate::domain::course::Course;
use crate::domain::errors::{CanvasError, CanvasResult};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Failure {
    Auth,
    Communication,
    Client,
}

impl Failure {
    fn into_error(self) -> CanvasError {
        match self {
            Failure::Auth => CanvasError::Authentication("401 Unauthorized".to_string()),
            Failure::Communication => CanvasError::Communication {
                status: Some(503),
                message: "503 Service Unavailable".to_string(),
            },
            Failure::Client => CanvasError::Client("boom".to_string()),
        }
    }
}

#[derive(Default)]
pub struct FakeCanvasApi {
    user_failure: Mutex<Option<Failure>>,
    observees: Mutex<Vec<Value>>,
    observees_failure: Mutex<Option<Failure>>,
    assignments: Mutex<Vec<MissingAssignment>>,
    assignments_failure: Mutex<Option<Failure>>,
    courses: Mutex<Vec<Course>>,
    courses_failure: Mutex<Option<Failure>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCanvasApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observees(self, observees: Vec<Value>) -> Self {
        *self.observees.lock().unwrap() = observees;
        self
    }

    pub fn set_assignments(&self, assignments: Vec<MissingAssignment>) {
        *self.assignments.lock().unwrap() = assignments;
    }

    pub fn set_courses(&self, courses: Vec<Course>) {
        *self.courses.lock().unwrap() = courses;
    }

    pub fn fail_user(&self, failure: Option<Failure>) {
        *self.user_failure.lock().unwrap() = failure;
    }

    pub fn fail_observees(&self, failure: Option<Failure>) {
        *self.observees_failure.lock().unwrap() = failure;
    }

    pub fn fail_assignments(&self, failure: Option<Failure>) {
        *self.assignments_failure.lock().unwrap() = failure;
    }

    pub fn fail_courses(&self, failure: Option<Failure>) {
        *self.courses_failure.lock().unwrap() = failure;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: &str, user_id: &str) {
        self.calls.lock().unwrap().push(format!("{}:{}", call, user_id));
    }

    fn check(failure: &Mutex<Option<Failure>>) -> CanvasResult<()> {
        match *failure.lock().unwrap() {
            Some(f) => Err(f.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CanvasApi for FakeCanvasApi {
    async fn get_user(&self, user_id: &str) -> CanvasResult<Value> {
        self.record("get_user", user_id);
        Self::check(&self.user_failure)?;
        Ok(json!({"id": 1, "name": "Pat Parent"}))
    }

    async fn get_observees(&self, user_id: &str) -> CanvasResult<Vec<Value>> {
        self.record("get_observees", user_id);
        Self::check(&self.observees_failure)?;
        Ok(self.observees.lock().unwrap().clone())
    }

    async fn get_missing_assignments(&self, user_id: &str) -> CanvasResult<Vec<MissingAssignment>> {
        self.record("get_missing_assignments", user_id);
        Self::check(&self.assignments_failure)?;
        Ok(self.assignments.lock().unwrap().clone())
    }

    async fn get_courses(&self, user_id: &str) -> CanvasResult<Vec<Course>> {
        self.record("get_courses", user_id);
        Self::check(&self.courses_failure)?;
        Ok(self.courses.lock().unwrap().clone())
    }
}

pub fn assignment(id: u64, name: &str) -> MissingAssignment {
    MissingAssignment {
        id,
        name: name.to_string(),
        description: Some(String::new()),
        due_date: Some("2024-01-01".to_string()),
        locks_at: None,
        course: "Algebra".to_string(),
        course_og_name: Some("Algebra I".to_string()),
    }
}

pub fn course(id: u64, name: &str) -> Course {
    Course {
        id,
        name: name.to_string(),
        friendly_name: None,
        syllabus: None,
        teacher: Some("Ms. Frizzle".to_string()),
        calendar_ics_url: None,
        term: json!({"name": "Fall 2024"}),
    }
}
