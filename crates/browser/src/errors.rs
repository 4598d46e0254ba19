use minutes::errors::ExtractError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("{0}")]
    MissingSession(String),
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("Navigation to {url} timed out after {}ms", .timeout.as_millis())]
    NavigationTimeout { url: String, timeout: Duration },
    #[error("Page script failed: {0}")]
    Script(String),
    #[error("No meeting content found on the rendered page")]
    ContentNotFound,
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Script(err.to_string())
    }
}

impl From<BrowserError> for ExtractError {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::MissingSession(msg) => ExtractError::MissingSession(msg),
            e @ (BrowserError::Navigation { .. } | BrowserError::NavigationTimeout { .. }) => {
                ExtractError::Navigation(e.to_string())
            }
            e @ BrowserError::ContentNotFound => ExtractError::ContentNotFound(e.to_string()),
            e => ExtractError::Browser(e.to_string()),
        }
    }
}
