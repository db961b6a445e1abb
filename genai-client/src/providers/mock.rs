//! In-memory provider for tests
//!
//! Stands in for a remote model: hands back a canned reply, or fails every
//! call the way a real request would.

use async_trait::async_trait;

use crate::error::{GenAiError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

enum MockBehavior {
    Reply(String),
    Fail(GenAiError),
}

pub struct MockProvider {
    behavior: MockBehavior,
}

impl MockProvider {
    /// Every call succeeds with the given reply text.
    pub fn always_succeeds(response: &str) -> Self {
        Self {
            behavior: MockBehavior::Reply(response.to_string()),
        }
    }

    /// Every call fails with the given error.
    pub fn always_fails(error: GenAiError) -> Self {
        Self {
            behavior: MockBehavior::Fail(error),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse> {
        match &self.behavior {
            MockBehavior::Reply(content) => Ok(LlmResponse {
                content: content.clone(),
                model: "mock-model".to_string(),
                usage: None,
            }),
            MockBehavior::Fail(err) => Err(replay_error(err)),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Rebuild the stored error for each call. Only the variants a remote call
/// can produce are replayed exactly; anything else collapses to `ApiError`.
fn replay_error(err: &GenAiError) -> GenAiError {
    match err {
        GenAiError::RateLimited { retry_after } => GenAiError::RateLimited {
            retry_after: *retry_after,
        },
        GenAiError::ServerOverloaded { message } => GenAiError::ServerOverloaded {
            message: message.clone(),
        },
        GenAiError::ApiError {
            message,
            status_code,
        } => GenAiError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        other => GenAiError::ApiError {
            message: other.to_string(),
            status_code: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LlmRequest {
        LlmRequest {
            prompt: "test".to_string(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = MockProvider::always_succeeds("success");

        let response = provider.complete(request()).await.unwrap();
        assert_eq!(response.content, "success");
        assert_eq!(response.model, "mock-model");
    }

    #[tokio::test]
    async fn test_always_fails_on_every_call() {
        let provider = MockProvider::always_fails(GenAiError::ServerOverloaded {
            message: "overloaded".to_string(),
        });

        for _ in 0..3 {
            let err = provider.complete(request()).await.unwrap_err();
            assert!(matches!(err, GenAiError::ServerOverloaded { .. }));
        }
    }

    #[tokio::test]
    async fn test_unreplayable_error_collapses_to_api_error() {
        let provider =
            MockProvider::always_fails(GenAiError::ConfigError("bad config".to_string()));

        let err = provider.complete(request()).await.unwrap_err();
        match err {
            GenAiError::ApiError { message, .. } => assert!(message.contains("bad config")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
