use serde::{Deserialize, Serialize};

use crate::error::{FilingInsightsError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
    pub prompt_eval_count: Option<usize>,
    pub eval_count: Option<usize>,
}

impl GenerateResponse {
    /// Trimmed reply text. A server-side error or an unfinished reply is a
    /// `ModelRequest` error.
    pub fn text(&self) -> Result<String> {
        if let Some(error) = &self.error {
            return Err(FilingInsightsError::ModelRequest(error.clone()));
        }
        if !self.done {
            return Err(FilingInsightsError::ModelRequest(
                "Ollama reply is incomplete (done = false)".to_string(),
            ));
        }
        Ok(self.response.as_deref().unwrap_or_default().trim().to_string())
    }
}

/// Text reply plus the undecoded response body.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub raw: serde_json::Value,
}

/// Joins an optional system preamble onto the prompt.
pub fn compose_prompt(prompt: &str, system: Option<&str>) -> String {
    match system {
        Some(system) if !system.is_empty() => format!("{}\n\n{}", system, prompt),
        _ => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prompt() {
        assert_eq!(compose_prompt("Summarize.", None), "Summarize.");
        assert_eq!(compose_prompt("Summarize.", Some("")), "Summarize.");
        assert_eq!(
            compose_prompt("Summarize.", Some("Be brief.")),
            "Be brief.\n\nSummarize."
        );
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            model: "qwen2.5:3b",
            prompt: "hi".to_string(),
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "qwen2.5:3b",
                "prompt": "hi",
                "stream": false,
                "options": { "temperature": 0.0 }
            })
        );
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let body: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(body.response.is_none());
        assert!(body.error.is_none());

        let body: GenerateResponse =
            serde_json::from_str(r#"{"response": " ok ", "done": true, "eval_count": 3}"#).unwrap();
        assert_eq!(body.response.as_deref(), Some(" ok "));
        assert_eq!(body.eval_count, Some(3));
    }

    #[test]
    fn test_response_text() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"response": " Apple sells phones. ", "done": true}"#).unwrap();
        assert_eq!(body.text().unwrap(), "Apple sells phones.");

        let body: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert_eq!(body.text().unwrap(), "");
    }

    #[test]
    fn test_unfinished_or_failed_reply_is_an_error() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"response": "partial", "done": false}"#).unwrap();
        assert!(matches!(
            body.text().unwrap_err(),
            FilingInsightsError::ModelRequest(_)
        ));

        let body: GenerateResponse =
            serde_json::from_str(r#"{"error": "model 'qwen2.5:3b' not found"}"#).unwrap();
        match body.text().unwrap_err() {
            FilingInsightsError::ModelRequest(msg) => assert!(msg.contains("not found")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
