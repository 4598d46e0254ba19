//! # Server Configuration
//!
//! The pipeline settings come from [`PipelineConfig`]; the server only adds its
//! listening port (`PORT`, default 9090).

use config::{Config as ConfigBuilder, Environment};
use minutes::config::{ConfigError, PipelineConfig};

pub const DEFAULT_PORT: u16 = 9090;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub pipeline: PipelineConfig,
}

/// Loads the port and the full pipeline configuration.
pub fn get_config() -> Result<ServerConfig, ConfigError> {
    let pipeline = PipelineConfig::load()?;
    Ok(ServerConfig {
        port: load_port()?,
        pipeline,
    })
}

pub fn load_port() -> Result<u16, ConfigError> {
    let settings = ConfigBuilder::builder()
        .set_default("port", DEFAULT_PORT as i64)?
        .add_source(Environment::default().try_parsing(true))
        .build()?;
    let port = settings.get_int("port")?;
    u16::try_from(port).map_err(|_| ConfigError::Invalid {
        name: "PORT".to_string(),
        reason: format!("{port} is not a valid port"),
    })
}
