use super::{
    ContactMessage, ContactResponse, HealthResponse, LoginRequest, LoginResponse,
    PredictResponse, PredictUpload,
};
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The server could not be reached.
    Connect(String),
    /// The connection broke or the request could not be sent.
    Network(String),
    Timeout,
    /// The server answered with a non-success status.
    Status { status: u16, message: Option<String> },
    /// The server answered but the body was not what was expected.
    Malformed(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(e) => write!(f, "connection failed: {}", e),
            TransportError::Network(e) => write!(f, "network error: {}", e),
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Status { status, message } => match message {
                Some(m) => write!(f, "server returned {}: {}", status, m),
                None => write!(f, "server returned {}", status),
            },
            TransportError::Malformed(e) => write!(f, "malformed response: {}", e),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_decode() {
            TransportError::Malformed(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// The prediction service endpoints used by the analysis client.
pub trait PredictionTransport: Send + Sync {
    fn predict(
        &self,
        upload: PredictUpload,
    ) -> impl Future<Output = Result<PredictResponse, TransportError>> + Send;

    fn health(&self) -> impl Future<Output = Result<HealthResponse, TransportError>> + Send;
}

/// Login and contact endpoints.
pub trait AccountTransport: Send + Sync {
    fn login(
        &self,
        request: LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, TransportError>> + Send;

    fn send_contact(
        &self,
        message: &ContactMessage,
        token: &str,
    ) -> impl Future<Output = Result<ContactResponse, TransportError>> + Send;
}
