//! Extraction service clients
//!
//! This module contains the boundary to the external language-model service:
//! the [`CompletionClient`] trait plus implementations for Ollama,
//! OpenAI-compatible endpoints, and a deterministic mock for tests.

use crate::{ExtractError, ExtractionRequest};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Raw textual payload returned by the extraction service. Opaque until
/// parsed; may be ill-formed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionResponse {
    pub text: String,
}

/// Boundary trait for the external extraction service.
///
/// `complete` is the pipeline's only suspension point; implementations must
/// not retry internally (resilience policy belongs to the surrounding
/// crawler) and must surface transport failures as
/// [`ExtractError::ServiceError`]. Dropping the returned future abandons the
/// in-flight request.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Name of the backing service, used in logs and errors.
    fn name(&self) -> &str;

    async fn complete(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResponse, ExtractError>;
}

fn service_error(service: &str, message: impl ToString) -> ExtractError {
    ExtractError::ServiceError {
        service: service.to_string(),
        message: message.to_string(),
    }
}

/// Client for a local or remote Ollama server.
pub struct OllamaClient {
    endpoint: Url,
    model: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(endpoint: &str, model: impl Into<String>) -> Result<Self, ExtractError> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self {
            endpoint,
            model: model.into(),
            client: reqwest::Client::new(),
        })
    }

    /// Replaces the HTTP client, e.g. to layer a timeout policy on top.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/api/generate",
            self.endpoint.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResponse, ExtractError> {
        let request_body = serde_json::json!({
            "model": self.model,
            "prompt": request.instruction(),
            "format": "json",
            "stream": false,
        });

        debug!(model = %self.model, "Sending extraction request to Ollama");

        let response = self
            .client
            .post(self.generate_url())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| service_error(self.name(), e))?;

        if !response.status().is_success() {
            return Err(service_error(
                self.name(),
                format!("server returned status {}", response.status()),
            ));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| service_error(self.name(), e))?;

        let text = response_json["response"]
            .as_str()
            .ok_or_else(|| service_error(self.name(), "no response field in server output"))?;

        Ok(ExtractionResponse {
            text: text.to_string(),
        })
    }
}

/// Client for any OpenAI-compatible chat completion endpoint.
pub struct OpenAiCompatClient {
    endpoint: Url,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(endpoint: &str, model: impl Into<String>) -> Result<Self, ExtractError> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self {
            endpoint,
            api_key: None,
            model: model.into(),
            client: reqwest::Client::new(),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.endpoint.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResponse, ExtractError> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": request.instruction(),
            }],
        });

        debug!(model = %self.model, "Sending extraction request to chat endpoint");

        let mut http_request = self.client.post(self.completions_url()).json(&request_body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| service_error(self.name(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(service_error(
                self.name(),
                format!("server returned status {}: {}", status, error_text),
            ));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| service_error(self.name(), e))?;

        let text = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| service_error(self.name(), "no message content in response"))?;

        Ok(ExtractionResponse {
            text: text.to_string(),
        })
    }
}

/// Deterministic client for tests and offline demos.
pub struct MockClient {
    outcome: MockOutcome,
}

enum MockOutcome {
    Respond(String),
    Fail(String),
}

impl MockClient {
    /// A client that answers every request with the given text.
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Respond(text.into()),
        }
    }

    /// A client whose every request fails with a transport error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Fail(message.into()),
        }
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        _request: &ExtractionRequest,
    ) -> Result<ExtractionResponse, ExtractError> {
        match &self.outcome {
            MockOutcome::Respond(text) => Ok(ExtractionResponse { text: text.clone() }),
            MockOutcome::Fail(message) => Err(service_error(self.name(), message)),
        }
    }
}
