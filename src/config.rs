//! Environment-based client configuration helpers

use crate::{ExtractError, OllamaClient, OpenAiCompatClient};

/// Configuration helper for extraction clients
pub struct ClientConfig;

impl ClientConfig {
    /// Create an Ollama client from environment variables
    pub fn ollama_from_env() -> Result<OllamaClient, ExtractError> {
        let endpoint = std::env::var("OLLAMA_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());

        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "mistral".to_string());

        OllamaClient::new(&endpoint, model)
    }

    /// Create an OpenAI-compatible client from environment variables
    pub fn openai_compat_from_env() -> Result<OpenAiCompatClient, ExtractError> {
        let endpoint = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ExtractError::InvalidConfiguration(
                "OPENAI_API_KEY environment variable not set".to_string(),
            )
        })?;

        if api_key.trim().is_empty() {
            return Err(ExtractError::InvalidConfiguration(
                "OPENAI_API_KEY cannot be empty".to_string(),
            ));
        }

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(OpenAiCompatClient::new(&endpoint, model)?.with_api_key(api_key))
    }
}
