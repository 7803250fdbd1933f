//! Single-shot prompt execution with token accounting.

use std::sync::Arc;
use tracing::debug;

use super::client::{CompletionRequest, LlmClient, LlmError};
use super::tokens::estimate_tokens;

/// Generated text plus its estimated token cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmAnswer {
    /// Completion text, trimmed of surrounding whitespace.
    pub text: String,
    /// `estimate_tokens(system + user + raw completion)`.
    pub tokens: usize,
}

/// Wraps an [`LlmClient`] to ask one question under one system instruction.
///
/// Constructed once at startup and shared by everything that needs to talk
/// to the model.
#[derive(Clone)]
pub struct LlmQueryClient {
    client: Arc<dyn LlmClient>,
    max_tokens: u32,
    temperature: f32,
}

impl LlmQueryClient {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            max_tokens: 256,
            temperature: 0.0,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Provider and model of the wrapped client, for logging.
    pub fn describe(&self) -> String {
        format!("{}/{}", self.client.provider(), self.client.model())
    }

    /// Run a system + user conversation and return the answer with its cost.
    ///
    /// Errors are returned untouched; callers decide how to degrade.
    pub async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<LlmAnswer, LlmError> {
        let request = CompletionRequest::new(user_text)
            .with_system(system_instruction)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        let response = self.client.complete(request).await?;

        let tokens = estimate_tokens(system_instruction)
            + estimate_tokens(user_text)
            + estimate_tokens(&response.text);

        debug!(
            "LLM call via {} used ~{} tokens (provider reported {} in / {} out)",
            self.describe(),
            tokens,
            response.usage.input_tokens,
            response.usage.output_tokens
        );

        Ok(LlmAnswer {
            text: response.text.trim().to_string(),
            tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLlmClient;

    #[tokio::test]
    async fn test_complete_estimates_whole_exchange() {
        let mock = Arc::new(MockLlmClient::new());
        mock.respond_to("genre", "comedy").await;
        let client = LlmQueryClient::new(mock.clone());

        let answer = client.complete("genre", "a funny movie").await.unwrap();

        assert_eq!(answer.text, "comedy");
        assert_eq!(answer.tokens, estimate_tokens("genrea funny moviecomedy"));
    }

    #[tokio::test]
    async fn test_complete_trims_answer_but_counts_raw_text() {
        let mock = Arc::new(MockLlmClient::new());
        mock.respond_to("actor", "  Tom Hanks\n").await;
        let client = LlmQueryClient::new(mock);

        let answer = client.complete("actor", "hi").await.unwrap();

        assert_eq!(answer.text, "Tom Hanks");
        assert_eq!(answer.tokens, estimate_tokens("actorhi  Tom Hanks\n"));
    }

    #[tokio::test]
    async fn test_complete_sends_system_and_settings() {
        let mock = Arc::new(MockLlmClient::new());
        mock.respond_to("genre", "drama").await;
        let client = LlmQueryClient::new(mock.clone())
            .with_max_tokens(16)
            .with_temperature(0.3);

        client.complete("genre", "something sad").await.unwrap();

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system.as_deref(), Some("genre"));
        assert_eq!(requests[0].prompt, "something sad");
        assert_eq!(requests[0].max_tokens, 16);
        assert_eq!(requests[0].temperature, 0.3);
    }

    #[tokio::test]
    async fn test_complete_propagates_provider_error() {
        let mock = Arc::new(MockLlmClient::new());
        mock.fail_on("genre", LlmError::Http("connection refused".to_string()))
            .await;
        let client = LlmQueryClient::new(mock);

        let result = client.complete("genre", "anything").await;
        assert!(matches!(result, Err(LlmError::Http(_))));
    }
}
