use minutes::errors::{ExtractError, StoreError};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum NotionError {
    #[error("Failed to reach the Notion API: {0}")]
    Fetch(String),
    #[error("Notion API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Invalid request header: {0}")]
    InvalidHeader(String),
    #[error("Unexpected Notion response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NotionError::Decode(err.to_string())
        } else {
            NotionError::Fetch(err.to_string())
        }
    }
}

impl From<NotionError> for StoreError {
    fn from(err: NotionError) -> Self {
        match err {
            NotionError::Api { status: 404, body } => StoreError::NotFound(body),
            NotionError::Api { status, body } => StoreError::Api { status, body },
            NotionError::Fetch(msg) | NotionError::InvalidHeader(msg) => StoreError::Request(msg),
            NotionError::Decode(msg) => StoreError::Payload(msg),
        }
    }
}

impl From<NotionError> for ExtractError {
    fn from(err: NotionError) -> Self {
        ExtractError::Api(err.to_string())
    }
}
