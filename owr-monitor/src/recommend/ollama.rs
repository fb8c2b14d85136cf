//! Ollama generate-API client

use super::RecommendError;
use async_trait::async_trait;
use owr_common::config::LlmConfig;
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = concat!("owr-monitor/", env!("CARGO_PKG_VERSION"));

/// Text-completion backend used by the recommendation cycle
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt`, returning the model's raw reply text
    async fn generate(&self, prompt: &str) -> Result<String, RecommendError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Client for `POST {base}/api/generate`
pub struct OllamaClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self, RecommendError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecommendError::LlmUnreachable(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/generate", config.server_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, RecommendError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "Querying language model");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecommendError::LlmUnreachable(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendError::LlmBadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RecommendError::LlmBadBody(e.to_string()))?;

        if !generated.done {
            tracing::debug!("Language model reported an unfinished generation");
        }

        Ok(generated.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let config = LlmConfig {
            server_url: "http://ollama.lan:11434/".to_string(),
            model: "llama3.2".to_string(),
            timeout: Duration::from_secs(5),
        };

        let client = OllamaClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://ollama.lan:11434/api/generate");
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            model: "llama3.2",
            prompt: "hello",
            stream: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"model": "llama3.2", "prompt": "hello", "stream": false})
        );
    }
}
