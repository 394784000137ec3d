// Error taxonomy for Canvas API access
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    /// Credentials were rejected (HTTP 401 or 403)
    #[error("Invalid credentials: {0}")]
    Authentication(String),

    /// Timeout, DNS/connection failure or a non-success status other than auth
    #[error("Error fetching information: {message}")]
    Communication {
        status: Option<u16>,
        message: String,
    },

    /// Anything unexpected, including payloads that don't have the documented shape
    #[error("Something really wrong happened: {0}")]
    Client(String),
}

impl CanvasError {
    pub fn communication(message: impl Into<String>) -> Self {
        Self::Communication {
            status: None,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Communication { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Client(format!("unexpected payload shape: {}", err))
    }
}

pub type CanvasResult<T> = Result<T, CanvasError>;
