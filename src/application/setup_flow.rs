// Setup flow - validates credentials and resolves the observee to poll
use crate::application::canvas_api::CanvasApi;
use crate::domain::errors::{CanvasError, CanvasResult};
use crate::domain::observee::{Observee, map_observees};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Base URL and API token entered by the user
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub api_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Inline form error shown next to the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormError {
    Auth,
    Connection,
    Unknown,
    NoObservees,
    InvalidObservee,
}

impl FormError {
    pub fn message(&self) -> &'static str {
        match self {
            FormError::Auth => "Invalid credentials: the Canvas API token was rejected",
            FormError::Connection => "Unable to connect to the Canvas server",
            FormError::Unknown => "Unexpected error while talking to Canvas",
            FormError::NoObservees => "This account is not observing anyone",
            FormError::InvalidObservee => "Pick one of the listed observees",
        }
    }

    fn from_canvas_error(err: &CanvasError) -> Self {
        match err {
            CanvasError::Authentication(_) => {
                warn!("{}", err);
                FormError::Auth
            }
            CanvasError::Communication { .. } => {
                error!("{}", err);
                FormError::Connection
            }
            CanvasError::Client(_) => {
                error!("{}", err);
                FormError::Unknown
            }
        }
    }
}

/// Finalized configuration produced by a completed flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupResult {
    pub credentials: Credentials,
    pub observee_id: String,
    /// Entry title
    pub observee_name: String,
}

/// What the caller should present next
#[derive(Debug, Clone, PartialEq)]
pub enum SetupStep {
    Credentials { error: Option<FormError> },
    SelectObservee {
        observees: Vec<Observee>,
        error: Option<FormError>,
    },
    Complete(SetupResult),
}

#[derive(Debug)]
enum FlowState {
    CollectCredentials,
    SelectObservee {
        credentials: Credentials,
        observees: Vec<Observee>,
    },
    Complete,
}

/// Builds an API client for a set of credentials
pub type Connector = Box<dyn Fn(&Credentials) -> CanvasResult<Arc<dyn CanvasApi>> + Send + Sync>;

/// Two-step flow. The observee list lives only as long as the flow.
pub struct SetupFlow {
    connector: Connector,
    state: FlowState,
}

impl SetupFlow {
    pub fn new(connector: Connector) -> Self {
        Self {
            connector,
            state: FlowState::CollectCredentials,
        }
    }

    pub fn start(&self) -> SetupStep {
        SetupStep::Credentials { error: None }
    }

    /// Validate the credentials and fetch the observees they can see
    pub async fn submit_credentials(&mut self, credentials: Credentials) -> SetupStep {
        self.state = FlowState::CollectCredentials;

        let api = match (self.connector)(&credentials) {
            Ok(api) => api,
            Err(err) => return Self::credentials_error(&err),
        };

        if let Err(err) = api.get_user("self").await {
            return Self::credentials_error(&err);
        }
        info!("Credentials accepted by {}", credentials.base_url);

        // Failures here map by kind like validation; an invalid token shows as `auth`
        let observees = match api
            .get_observees("self")
            .await
            .and_then(|records| map_observees(&records))
        {
            Ok(observees) => observees,
            Err(err) => return Self::credentials_error(&err),
        };

        if observees.is_empty() {
            warn!("No observees linked to this account");
            return SetupStep::Credentials {
                error: Some(FormError::NoObservees),
            };
        }

        info!("Found {} observees", observees.len());
        self.state = FlowState::SelectObservee {
            credentials,
            observees: observees.clone(),
        };
        SetupStep::SelectObservee {
            observees,
            error: None,
        }
    }

    /// Finish the flow with one of the listed observees
    pub fn select_observee(&mut self, observee_id: &str) -> SetupStep {
        let FlowState::SelectObservee { credentials, observees } = &self.state else {
            return SetupStep::Credentials { error: None };
        };

        let Some(observee) = observees.iter().find(|o| o.id == observee_id) else {
            return SetupStep::SelectObservee {
                observees: observees.clone(),
                error: Some(FormError::InvalidObservee),
            };
        };

        let result = SetupResult {
            credentials: credentials.clone(),
            observee_id: observee.id.clone(),
            observee_name: observee.display_name.clone(),
        };
        info!("Setup complete for observee {}", result.observee_name);
        self.state = FlowState::Complete;
        SetupStep::Complete(result)
    }

    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, FlowState::Complete)
    }

    fn credentials_error(err: &CanvasError) -> SetupStep {
        SetupStep::Credentials {
            error: Some(FormError::from_canvas_error(err)),
        }
    }
}
