//! Client for an Ollama-style text-completion API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{Result, ServiceError};

/// Text-completion seam. The pipeline talks to this trait so tests can
/// substitute a scripted provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends a rendered prompt and returns the model's text content.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: u32,
    #[serde(default)]
    total_duration: u64,
}

/// Completion client over HTTP. No retries; the configured request timeout
/// is the only backstop on a stalled upstream call.
pub struct OllamaClient {
    client: Client,
    config: LlmConfig,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Sending completion request");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(ref api_key) = self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ServiceError::llm(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServiceError::llm(format!("HTTP {status}: {error_text}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::llm(e.to_string()))?;

        debug!(
            eval_count = body.eval_count,
            duration_ms = body.total_duration / 1_000_000,
            "Completion response received"
        );

        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> LlmConfig {
        LlmConfig {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(120),
            temperature: 0.2,
            max_tokens: 512,
        }
    }

    #[test]
    fn test_client_creation() {
        assert!(OllamaClient::new(test_config()).is_ok());
    }

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            model: "llama3.1",
            prompt: "How much Benadryl is left?",
            temperature: 0.2,
            max_tokens: 512,
            stream: false,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.1");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_generate_response_deserialization() {
        let json = r#"{"model":"llama3.1","response":"2","done":true,"eval_count":12}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.response, "2");
        assert_eq!(response.eval_count, 12);
        assert_eq!(response.total_duration, 0);
    }
}
