//! Error taxonomy for collaborator calls.
//!
//! Every fetch/upload/delete/auth operation returns `Result<_, ApiError>`. The UI turns each
//! variant into a notification; nothing here is meant to escape as a panic.

use thiserror::Error;

/// Transport-level failure: the request never completed or its body could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Input rejected locally, before any request is issued.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select at least one file")]
    NoFilesSelected,
    #[error("Please select at least one item to delete")]
    NoItemsSelected,
    #[error("{0} is required")]
    EmptyField(&'static str),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never completed.
    #[error("network failure: {0}")]
    Network(#[from] HttpError),
    /// The server answered `success: false` with a message.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the server".to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Validation(err) => err.to_string(),
            Self::Decode(_) => "The server sent an unexpected response".to_string(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(String),
    #[error("API_BASE_URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}
