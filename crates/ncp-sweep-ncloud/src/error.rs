//! NAVER Cloud API error types

use ncp_sweep_cloud::{CloudError, ResourceKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NcloudError {
    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Unsupported operation for {kind}: {operation}")]
    Unsupported {
        kind: ResourceKind,
        operation: String,
    },

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NcloudError>;

impl From<NcloudError> for CloudError {
    fn from(error: NcloudError) -> Self {
        match error {
            NcloudError::Status { status, body } => CloudError::HttpStatus { status, body },
            NcloudError::Http(e) => CloudError::Transport(e.to_string()),
            NcloudError::InvalidUrl(msg) => CloudError::InvalidConfig(msg),
            NcloudError::InvalidCredentials(msg) => CloudError::AuthenticationFailed(msg),
            NcloudError::UnexpectedResponse(msg) => CloudError::MalformedResponse(msg),
            NcloudError::Unsupported { kind, operation } => {
                CloudError::Unsupported { kind, operation }
            }
            NcloudError::JsonError(e) => CloudError::MalformedResponse(e.to_string()),
        }
    }
}
