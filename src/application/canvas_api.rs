// Canvas API seam used by the coordinator and the setup flow
use crate::domain::assignment::MissingAssignment;
use crate::domain::course::Course;
use crate::domain::errors::CanvasResult;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait CanvasApi: Send + Sync {
    /// Raw user record ("self" is the token owner)
    async fn get_user(&self, user_id: &str) -> CanvasResult<Value>;

    /// Raw observee records linked to a user
    async fn get_observees(&self, user_id: &str) -> CanvasResult<Vec<Value>>;

    /// Submittable assignments with no submission, mapped to flat records
    async fn get_missing_assignments(&self, user_id: &str) -> CanvasResult<Vec<MissingAssignment>>;

    /// Actively enrolled courses, mapped to flat records
    async fn get_courses(&self, user_id: &str) -> CanvasResult<Vec<Course>>;
}
