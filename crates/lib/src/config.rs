//! # Pipeline Configuration
//!
//! Configuration is resolved once at process start and never mutated. Values are
//! layered: built-in defaults, then an optional `minutes.yml` in the working
//! directory, then environment variables (`SOURCE_TOKEN`, `POLL_INTERVAL_MS`, ...).
//!
//! Every missing required variable is reported in a single error so an operator
//! can fix the environment in one pass.

use config::{Config, Environment, File, FileFormat};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_STATUS_PROPERTY: &str = "Status";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_ERROR_RETRY_DELAY_MS: u64 = 30_000;
pub const DEFAULT_SESSION_FILE_PATH: &str = "data/session.json";
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";
pub const DEFAULT_WEB_BASE_URL: &str = "https://www.notion.so";
pub const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 100;
pub const DEFAULT_BROWSER_MAX_RETRIES: u32 = 3;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
    #[error("Configuration error: {0}")]
    General(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// How the status property is typed in the source collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The service's native status property.
    Status,
    /// A plain single-select property.
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusProperty {
    pub name: String,
    pub kind: StatusKind,
}

/// Property names of the destination (task) collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProperties {
    pub title: String,
    pub assignee: String,
    pub due_date: String,
    pub priority: String,
    pub source: String,
}

impl Default for TaskProperties {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            assignee: "Assignee".to_string(),
            due_date: "Due Date".to_string(),
            priority: "Priority".to_string(),
            source: "Source".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSettings {
    pub max_scrolls: u32,
    pub step_px: u32,
    pub wait: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            max_scrolls: 20,
            step_px: 800,
            wait: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProviderKind {
    /// Any OpenAI-compatible chat completions endpoint.
    OpenAi,
    Gemini,
}

#[derive(Clone, PartialEq)]
pub struct ModelConfig {
    pub provider: ModelProviderKind,
    pub api_key: String,
    pub api_url: String,
    pub model_name: String,
    pub temperature: f32,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

/// The subset of configuration needed to pull raw text out of a document.
#[derive(Clone, PartialEq)]
pub struct ExtractionConfig {
    pub source_token: String,
    pub api_base_url: String,
    pub api_version: String,
    pub web_base_url: String,
    pub session_file_path: PathBuf,
    /// A browser session cookie used when no session file exists.
    pub session_token: Option<String>,
    pub min_content_length: usize,
    pub browser_max_retries: u32,
    pub navigation_timeout: Duration,
    pub scroll: ScrollSettings,
}

impl std::fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("web_base_url", &self.web_base_url)
            .field("session_file_path", &self.session_file_path)
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("min_content_length", &self.min_content_length)
            .field("browser_max_retries", &self.browser_max_retries)
            .field("navigation_timeout", &self.navigation_timeout)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

/// Process-wide configuration for the polling pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub extraction: ExtractionConfig,
    pub model: ModelConfig,
    pub source_collection_id: String,
    pub destination_collection_id: String,
    pub status_property: StatusProperty,
    pub task_properties: TaskProperties,
    pub poll_interval: Duration,
    pub error_retry_delay: Duration,
    /// When set, documents stuck in `Processing` longer than this are moved to `Error`.
    pub stale_processing_after: Option<Duration>,
}

impl ExtractionConfig {
    /// Loads the extraction subset. Only `SOURCE_TOKEN` is required.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Settings::load()?;
        let mut missing = Vec::new();
        let config = Self::from_settings(&settings, &mut missing)?;
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }
        Ok(config)
    }

    fn from_settings(settings: &Settings, missing: &mut Vec<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            source_token: settings.required("source_token", missing),
            api_base_url: settings.string_or("source_api_base_url", DEFAULT_API_BASE_URL),
            api_version: settings.string_or("source_api_version", DEFAULT_API_VERSION),
            web_base_url: settings.string_or("source_web_base_url", DEFAULT_WEB_BASE_URL),
            session_file_path: PathBuf::from(
                settings.string_or("session_file_path", DEFAULT_SESSION_FILE_PATH),
            ),
            session_token: settings.optional("session_token"),
            min_content_length: settings
                .bounded_or("min_content_length", DEFAULT_MIN_CONTENT_LENGTH)?,
            browser_max_retries: settings
                .bounded_or("browser_max_retries", DEFAULT_BROWSER_MAX_RETRIES)?
                .max(1),
            navigation_timeout: Duration::from_millis(
                settings.number_or("browser_navigation_timeout_ms", DEFAULT_NAVIGATION_TIMEOUT_MS)?,
            ),
            scroll: ScrollSettings {
                max_scrolls: settings.bounded_or("scroll_max", 20u32)?,
                step_px: settings.bounded_or("scroll_step_px", 800u32)?,
                wait: Duration::from_millis(settings.number_or("scroll_wait_ms", 500)?),
            },
        })
    }
}

impl PipelineConfig {
    /// Loads the full configuration, failing with every missing required name.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Settings::load()?;
        let mut missing = Vec::new();

        let extraction = ExtractionConfig::from_settings(&settings, &mut missing)?;
        let api_key = settings.required("model_api_key", &mut missing);
        let source_collection_id = settings.required("source_collection_id", &mut missing);
        let destination_collection_id = settings.required("destination_collection_id", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        let provider = match settings.string_or("model_provider", "openai").to_lowercase().as_str() {
            "openai" | "local" => ModelProviderKind::OpenAi,
            "gemini" => ModelProviderKind::Gemini,
            other => {
                return Err(ConfigError::Invalid {
                    name: "MODEL_PROVIDER".into(),
                    reason: format!("unsupported provider '{other}'"),
                })
            }
        };
        let model_name = settings.string_or("model_name", DEFAULT_MODEL_NAME);
        let api_url = settings.optional("model_api_url").unwrap_or_else(|| match provider {
            ModelProviderKind::OpenAi => "https://api.openai.com/v1/chat/completions".to_string(),
            ModelProviderKind::Gemini => format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{model_name}:generateContent"
            ),
        });
        let temperature = settings.float_or("model_temperature", 0.1)? as f32;

        let kind = match settings.string_or("status_property_kind", "status").to_lowercase().as_str() {
            "status" => StatusKind::Status,
            "select" => StatusKind::Select,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STATUS_PROPERTY_KIND".into(),
                    reason: format!("expected 'status' or 'select', got '{other}'"),
                })
            }
        };

        let defaults = TaskProperties::default();
        let task_properties = TaskProperties {
            title: settings.string_or("task_title_property", &defaults.title),
            assignee: settings.string_or("task_assignee_property", &defaults.assignee),
            due_date: settings.string_or("task_due_property", &defaults.due_date),
            priority: settings.string_or("task_priority_property", &defaults.priority),
            source: settings.string_or("task_source_property", &defaults.source),
        };

        let stale_processing_after = match settings.optional("stale_processing_ms") {
            Some(raw) => Some(Duration::from_millis(parse_number("stale_processing_ms", &raw)?)),
            None => None,
        };

        Ok(Self {
            extraction,
            model: ModelConfig {
                provider,
                api_key,
                api_url,
                model_name,
                temperature,
            },
            source_collection_id,
            destination_collection_id,
            status_property: StatusProperty {
                name: settings.string_or("status_property_name", DEFAULT_STATUS_PROPERTY),
                kind,
            },
            task_properties,
            poll_interval: Duration::from_millis(
                settings.number_or("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS)?,
            ),
            error_retry_delay: Duration::from_millis(
                settings.number_or("error_retry_delay_ms", DEFAULT_ERROR_RETRY_DELAY_MS)?,
            ),
            stale_processing_after,
        })
    }
}

/// Thin wrapper over the layered `config::Config`.
struct Settings(Config);

impl Settings {
    fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::new("minutes", FileFormat::Yaml).required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?;
        Ok(Self(config))
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.0
            .get_string(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str, missing: &mut Vec<String>) -> String {
        self.optional(key).unwrap_or_else(|| {
            missing.push(key.to_uppercase());
            String::new()
        })
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn number_or(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        match self.optional(key) {
            Some(raw) => parse_number(key, &raw),
            None => Ok(default),
        }
    }

    /// Like [`Self::number_or`], rejecting values that do not fit `T`.
    fn bounded_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: TryFrom<u64>,
        T::Error: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => T::try_from(parse_number(key, &raw)?).map_err(|e| ConfigError::Invalid {
                name: key.to_uppercase(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn float_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        match self.optional(key) {
            Some(raw) => raw.parse::<f64>().map_err(|e| ConfigError::Invalid {
                name: key.to_uppercase(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
        name: key.to_uppercase(),
        reason: e.to_string(),
    })
}
