// Canvas REST API client
use crate::application::canvas_api::CanvasApi;
use crate::application::setup_flow::{Connector, Credentials};
use crate::domain::assignment::{MissingAssignment, map_missing_assignments};
use crate::domain::course::{Course, map_courses};
use crate::domain::errors::{CanvasError, CanvasResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Clone)]
pub struct CanvasClient {
    base_url: String,
    token: String,
    client: Client,
}

impl CanvasClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> CanvasResult<Self> {
        Self::with_timeout(base_url, token, REQUEST_TIMEOUT)
    }

    fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> CanvasResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CanvasError::Client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    pub fn from_credentials(credentials: &Credentials) -> CanvasResult<Self> {
        Self::new(&credentials.base_url, &credentials.api_token)
    }

    /// Connector handed to the setup flow
    pub fn connector() -> Connector {
        Box::new(|credentials: &Credentials| -> CanvasResult<Arc<dyn CanvasApi>> {
            Ok(Arc::new(CanvasClient::from_credentials(credentials)?))
        })
    }

    fn user_path(user_id: &str, resource: &str) -> String {
        format!("/v1/users/{}{}", urlencoding::encode(user_id), resource)
    }

    /// Single attempt against `base_url + path`, classified into the error taxonomy
    async fn api_wrapper(&self, method: Method, path: &str, data: Option<&Value>) -> CanvasResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .bearer_auth(&self.token);
        if let Some(body) = data {
            request = request.json(body);
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let response = verify_response_or_raise(response).await?;

        // Reading the body is still transport; only the JSON parse is a client error
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                classify_transport_error(e)
            } else {
                CanvasError::communication(format!("Error reading response from {} - {}", path, e))
            }
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            CanvasError::Client(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    async fn get(&self, path: &str) -> CanvasResult<Value> {
        self.api_wrapper(Method::GET, path, None).await
    }
}

async fn verify_response_or_raise(response: Response) -> CanvasResult<Response> {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            error!("Canvas rejected the credentials with status {}", status);
            Err(CanvasError::Authentication(status.to_string()))
        }
        status if !status.is_success() => {
            let body = response.text().await.unwrap_or_default();
            error!("Canvas request failed with status {}: {}", status, body);
            Err(CanvasError::Communication {
                status: Some(status.as_u16()),
                message: format!("status {}", status),
            })
        }
        _ => Ok(response),
    }
}

fn classify_transport_error(err: reqwest::Error) -> CanvasError {
    if err.is_timeout() {
        CanvasError::communication(format!("Timeout error fetching information - {}", err))
    } else if err.is_connect() || err.is_request() {
        CanvasError::communication(err.to_string())
    } else {
        CanvasError::Client(err.to_string())
    }
}

#[async_trait]
impl CanvasApi for CanvasClient {
    async fn get_user(&self, user_id: &str) -> CanvasResult<Value> {
        self.get(&Self::user_path(user_id, "")).await
    }

    async fn get_observees(&self, user_id: &str) -> CanvasResult<Vec<Value>> {
        let payload = self.get(&Self::user_path(user_id, "/observees")).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn get_missing_assignments(&self, user_id: &str) -> CanvasResult<Vec<MissingAssignment>> {
        let path = Self::user_path(
            user_id,
            "/missing_submissions?include[]=course&filter[]=submittable",
        );
        let assignments = map_missing_assignments(self.get(&path).await?)?;
        info!("Mapped {} missing assignments for {}", assignments.len(), user_id);
        Ok(assignments)
    }

    async fn get_courses(&self, user_id: &str) -> CanvasResult<Vec<Course>> {
        let path = Self::user_path(
            user_id,
            "/courses?include[]=teachers&include[]=term&include[]=syllabus_body&enrollment_state=active",
        );
        let courses = map_courses(self.get(&path).await?)?;
        info!("Mapped {} courses for {}", courses.len(), user_id);
        Ok(courses)
    }
}
