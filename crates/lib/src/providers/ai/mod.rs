pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Sampling and output-format options for a single generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    /// Ask the provider for a JSON-only response.
    pub json_mode: bool,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            json_mode: false,
            max_tokens: None,
        }
    }
}

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface over different Large Language Models
/// (OpenAI-compatible endpoints, Gemini) so the structured extraction step can be
/// tested against a fake.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// Returns `Ok(None)` when the provider answered but produced no content.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Option<String>, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
