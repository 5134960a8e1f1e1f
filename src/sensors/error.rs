use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Failure of a single sensor probe
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProbeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("probe timed out")]
    Timeout,
    #[error("sensor API returned HTTP {0}")]
    Status(u16),
    #[error("no credential configured for the sensor API")]
    MissingCredential,
    #[error("sensor returned no usable reading")]
    Empty,
    #[error("malformed sensor payload: {0}")]
    Malformed(String),
}

impl ProbeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::Network(_) => ErrorKind::Network,
            ProbeError::Timeout => ErrorKind::Timeout,
            ProbeError::Status(429) => ErrorKind::RateLimit,
            ProbeError::Status(401) | ProbeError::MissingCredential => ErrorKind::ApiKey,
            ProbeError::Status(404) | ProbeError::Empty => ErrorKind::NotFound,
            ProbeError::Status(_) | ProbeError::Malformed(_) => ErrorKind::Unknown,
        }
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout
        } else if let Some(status) = e.status() {
            ProbeError::Status(status.as_u16())
        } else if e.is_decode() {
            ProbeError::Malformed(e.to_string())
        } else {
            ProbeError::Network(e.to_string())
        }
    }
}

/// Classification attached to a degraded estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Timeout,
    RateLimit,
    ApiKey,
    NotFound,
    Unknown,
}

/// Error descriptor carried by an `AqiEstimate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EstimateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&ProbeError> for EstimateError {
    fn from(e: &ProbeError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}
