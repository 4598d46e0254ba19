//! # AI Provider Factory
//!
//! Builds the configured AI provider instance. Consumers (server, tests) share
//! the same construction path so a provider is configured identically everywhere.

use crate::{
    config::{ModelConfig, ModelProviderKind},
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
};
use tracing::info;

/// Creates the AI provider described by `model`.
pub fn create_provider(model: &ModelConfig) -> Result<Box<dyn AiProvider>, PromptError> {
    if model.api_key.is_empty() {
        return Err(PromptError::MissingAiProvider(
            "MODEL_API_KEY must be set".to_string(),
        ));
    }

    let provider: Box<dyn AiProvider> = match model.provider {
        ModelProviderKind::OpenAi => {
            info!(
                "Configuring OpenAI-compatible provider with URL: {} (model: {})",
                model.api_url, model.model_name
            );
            Box::new(LocalAiProvider::new(
                model.api_url.clone(),
                Some(model.api_key.clone()),
                Some(model.model_name.clone()),
            )?)
        }
        ModelProviderKind::Gemini => {
            info!("Configuring Gemini provider with URL: {}", model.api_url);
            Box::new(GeminiProvider::new(
                model.api_url.clone(),
                model.api_key.clone(),
            )?)
        }
    };

    Ok(provider)
}
