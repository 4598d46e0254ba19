//! Browser session acquisition.
//!
//! A persisted storage-state file is preferred; otherwise a session cookie is
//! seeded from a configured token. Without either the agent fails at once and
//! never waits for an interactive login.

use crate::errors::BrowserError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SESSION_COOKIE_NAME: &str = "token_v2";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    StateFile,
    Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub cookies: Vec<SessionCookie>,
    pub origin: SessionOrigin,
}

/// Storage-state JSON as written by common browser automation tools.
#[derive(Deserialize)]
struct StorageState {
    #[serde(default)]
    cookies: Vec<SessionCookie>,
}

#[derive(Debug, Clone)]
pub struct SessionSource {
    pub state_file: PathBuf,
    pub token: Option<String>,
    /// Domain the seeded cookie is scoped to, e.g. `.notion.so`.
    pub cookie_domain: String,
}

impl SessionSource {
    pub fn new(state_file: impl Into<PathBuf>, token: Option<String>, web_base_url: &str) -> Self {
        Self {
            state_file: state_file.into(),
            token,
            cookie_domain: cookie_domain(web_base_url),
        }
    }

    pub async fn load(&self) -> Result<Session, BrowserError> {
        match read_state_file(&self.state_file).await {
            Ok(Some(cookies)) if !cookies.is_empty() => {
                info!(
                    "Using {} cookie(s) from session file {}",
                    cookies.len(),
                    self.state_file.display()
                );
                return Ok(Session {
                    cookies,
                    origin: SessionOrigin::StateFile,
                });
            }
            Ok(Some(_)) => warn!("Session file {} has no cookies", self.state_file.display()),
            Ok(None) => debug!("No session file at {}", self.state_file.display()),
            Err(e) => warn!("Ignoring unreadable session file {}: {e}", self.state_file.display()),
        }

        match self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                info!("Seeding browser session from the configured token");
                Ok(Session {
                    cookies: vec![SessionCookie {
                        name: SESSION_COOKIE_NAME.to_string(),
                        value: token.trim().to_string(),
                        domain: self.cookie_domain.clone(),
                        path: default_path(),
                        secure: true,
                        http_only: true,
                    }],
                    origin: SessionOrigin::Token,
                })
            }
            None => Err(BrowserError::MissingSession(format!(
                "no session file at {} and SESSION_TOKEN is not set; save a logged-in browser session first",
                self.state_file.display()
            ))),
        }
    }
}

async fn read_state_file(path: &Path) -> Result<Option<Vec<SessionCookie>>, String> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    let state: StorageState = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(state.cookies))
}

/// `https://www.notion.so` becomes `.notion.so`.
pub fn cookie_domain(web_base_url: &str) -> String {
    let host = url::Url::parse(web_base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| web_base_url.to_string());
    let host = host.strip_prefix("www.").unwrap_or(&host);
    format!(".{host}")
}
