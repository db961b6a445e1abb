//! Gemini API provider
//!
//! Direct HTTP implementation of the Google generative-language
//! `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{GenAiError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fixed per-call network timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Provider for direct Gemini API calls
pub struct GeminiProvider {
    model: String,
    base_url: String,
    api_key: String,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(model: &str, api_key: String, base_url: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenAiError::ApiError {
                message: format!("Failed to build HTTP client: {}", e),
                status_code: None,
            })?;

        Ok(Self {
            model: model.to_string(),
            base_url: base_url
                .unwrap_or(GEMINI_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

// Gemini API request/response types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Map a non-2xx reply to a structured error. 429 and 503 are mapped
/// separately so callers can tell capacity problems from request problems.
fn map_error_status(status: u16, body: &str) -> GenAiError {
    let message = if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
        error_response.error.message
    } else {
        body.to_string()
    };

    match status {
        429 => GenAiError::RateLimited { retry_after: None },
        503 => GenAiError::ServerOverloaded { message },
        code => GenAiError::ApiError {
            message,
            status_code: Some(code),
        },
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let generation_config = if request.max_tokens.is_some() || request.temperature.is_some() {
            Some(GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            })
        } else {
            None
        };

        let api_request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system_prompt.as_ref().map(|s| SystemInstruction {
                parts: vec![Part { text: s.clone() }],
            }),
            generation_config,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| GenAiError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_error_status(status.as_u16(), &error_text));
        }

        let api_response: GenerateContentResponse =
            response.json().await.map_err(|e| GenAiError::ApiError {
                message: format!("Failed to parse response: {}", e),
                status_code: None,
            })?;

        let content = api_response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();

        let usage = api_response.usage_metadata.map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            usage,
        })
    }

    fn name(&self) -> &'static str {
        "Gemini API"
    }

    fn is_available(&self) -> Result<()> {
        // API key was provided in constructor
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model_and_key() {
        let provider = GeminiProvider::new("gemini-1.5-flash", "secret".to_string(), None).unwrap();
        let url = provider.endpoint();
        assert!(url.starts_with(GEMINI_API_BASE));
        assert!(url.contains("gemini-1.5-flash:generateContent"));
        assert!(url.ends_with("key=secret"));
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let provider =
            GeminiProvider::new("m", "k".to_string(), Some("http://localhost:9999/v1/")).unwrap();
        assert!(provider.endpoint().starts_with("http://localhost:9999/v1/m:"));
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "hello"}], "role": "model"}}
            ],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        let usage = parsed.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, 10);
        assert_eq!(usage.candidates_token_count, 5);
    }

    #[test]
    fn test_rate_limit_status_maps_to_rate_limited() {
        let err = map_error_status(429, r#"{"error": {"message": "quota exceeded"}}"#);
        assert!(matches!(err, GenAiError::RateLimited { .. }));
    }

    #[test]
    fn test_overload_status_maps_to_server_overloaded() {
        let err = map_error_status(503, r#"{"error": {"message": "model is overloaded"}}"#);
        match err {
            GenAiError::ServerOverloaded { message } => {
                assert_eq!(message, "model is overloaded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_other_status_keeps_code_and_raw_body() {
        // a reply that is not the documented error envelope passes through as-is
        let err = map_error_status(400, "bad request body");
        match err {
            GenAiError::ApiError {
                message,
                status_code,
            } => {
                assert_eq!(message, "bad request body");
                assert_eq!(status_code, Some(400));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_response_yields_no_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
        assert!(parsed.usage_metadata.is_none());
    }
}
