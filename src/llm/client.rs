use crate::error::{FilingInsightsError, Result};
use crate::llm::types::*;
use crate::pipeline::TextGenerator;
use log::debug;
use reqwest::Client;
use std::time::Duration;

const OLLAMA_DEFAULT_HOST: &str = "http://localhost:11434";
const OLLAMA_DEFAULT_MODEL: &str = "qwen2.5:3b";
const OLLAMA_DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: OLLAMA_DEFAULT_HOST.to_string(),
            model: OLLAMA_DEFAULT_MODEL.to_string(),
            timeout_secs: OLLAMA_DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    /// Reads `OLLAMA_HOST`, `OLLAMA_MODEL` and `OLLAMA_TIMEOUT_SECS`, keeping
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("OLLAMA_HOST").unwrap_or(defaults.host),
            model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            timeout_secs: std::env::var("OLLAMA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.host.trim_end_matches('/'))
    }
}

/// Local Ollama server client. Requires `ollama serve` and a pulled model.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    pub async fn generate_raw(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> Result<LlmResponse> {
        let payload = GenerateRequest {
            model: &self.config.model,
            prompt: compose_prompt(prompt, system),
            stream: false,
            options: GenerateOptions { temperature },
        };

        let res = self
            .client
            .post(self.config.generate_url())
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(FilingInsightsError::ModelRequest(format!(
                "Ollama API error (status {}): {}",
                status, err_text
            )));
        }

        let raw: serde_json::Value = res.json().await?;
        let body: GenerateResponse = serde_json::from_value(raw.clone())?;

        debug!(
            "Ollama {}: {:?} prompt tokens, {:?} output tokens",
            self.config.model, body.prompt_eval_count, body.eval_count
        );

        let text = body.text()?;
        Ok(LlmResponse { text, raw })
    }
}

impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str, system: Option<&str>, temperature: f32) -> Result<String> {
        Ok(self.generate_raw(prompt, system, temperature).await?.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OllamaConfig::default();
        assert_eq!(config.generate_url(), "http://localhost:11434/api/generate");
        assert_eq!(config.model, "qwen2.5:3b");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_trailing_slash_in_host() {
        let config = OllamaConfig {
            host: "http://gpu-box:11434/".to_string(),
            ..OllamaConfig::default()
        };
        assert_eq!(config.generate_url(), "http://gpu-box:11434/api/generate");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let config = OllamaConfig {
            host: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OllamaConfig::default()
        };
        let client = OllamaClient::new(config).unwrap();
        let err = client.generate("hello", None, 0.0).await.unwrap_err();
        assert!(matches!(err, FilingInsightsError::Http(_)));
    }
}
