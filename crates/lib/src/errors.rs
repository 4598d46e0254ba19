use thiserror::Error;

/// Errors raised while talking to a language model provider.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Errors raised by a [`DocumentStore`](crate::store::DocumentStore) implementation.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Request to the document store failed: {0}")]
    Request(String),
    #[error("Document store returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Unexpected document store payload: {0}")]
    Payload(String),
}

/// Errors raised while pulling raw text out of a source document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No browser session could be established. Never retried.
    #[error("No browser session available: {0}")]
    MissingSession(String),
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Content not found: {0}")]
    ContentNotFound(String),
    #[error("Official API extraction failed: {0}")]
    Api(String),
    #[error("Browser automation failed: {0}")]
    Browser(String),
}

impl ExtractError {
    /// Whether another attempt has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExtractError::MissingSession(_))
    }
}

/// A failure of one pipeline stage for one document.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("structured extraction failed: {0}")]
    Analysis(String),
    #[error("write-back failed: {0}")]
    WriteBack(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
