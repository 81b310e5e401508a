//! The two calls the wizard makes against the text
//! generation backend: produce a resume from a prompt, and translate a result.

use std::sync::Arc;

use tracing::info;

use crate::llm_client::prompts::{RESUME_SYSTEM, TRANSLATE_SYSTEM};
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};

const RESUME_TEMPERATURE: f32 = 0.7;
const RESUME_MAX_TOKENS: u32 = 1000;
const TRANSLATE_TEMPERATURE: f32 = 0.2;
const TRANSLATE_MAX_TOKENS: u32 = 2000;

/// Explicitly constructed wrapper around an injected backend.
#[derive(Clone)]
pub struct CompletionClient {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl CompletionClient {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// Generates a resume from an assembled prompt.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        info!("Requesting resume generation ({} prompt chars)", prompt.len());
        self.run(RESUME_SYSTEM, prompt, RESUME_TEMPERATURE, RESUME_MAX_TOKENS)
            .await
    }

    /// Translates a generated resume with the fixed translation instruction.
    pub async fn translate(&self, text: &str) -> Result<String, LlmError> {
        info!("Requesting translation ({} chars)", text.len());
        self.run(TRANSLATE_SYSTEM, text, TRANSLATE_TEMPERATURE, TRANSLATE_MAX_TOKENS)
            .await
    }

    async fn run(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = GenerationRequest {
            system: system.to_string(),
            prompt: prompt.to_string(),
            model: self.model.clone(),
            temperature,
            max_tokens,
        };
        let text = self.generator.generate(&request).await?;
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }
}
