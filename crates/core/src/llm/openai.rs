//! OpenAI chat completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::{
    mask_api_key, CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage,
};

/// OpenAI API client.
///
/// Also works against OpenAI-compatible endpoints via [`OpenAiClient::with_api_base`].
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: "https://api.openai.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt,
        });

        let chat_request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            "OpenAI chat completion: model={} api_key={}",
            self.model,
            mask_api_key(&self.api_key)
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_base))
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api { status, message });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Json(e.to_string()))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyCompletion)?;

        let usage = chat_response
            .usage
            .map(|u| LlmUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            text,
            usage,
            model: chat_response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_openai_client_creation() {
        let client = OpenAiClient::new("sk-test", "gpt-3.5-turbo");
        assert_eq!(client.provider(), "openai");
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.api_base, "https://api.openai.com");
    }

    #[tokio::test]
    async fn test_complete_sends_system_and_user_turns() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "Name the genre"},
                    {"role": "user", "content": "a funny movie"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "model": "gpt-3.5-turbo-0125",
                    "choices": [
                        {"index": 0, "message": {"role": "assistant", "content": "comedy"}}
                    ],
                    "usage": {"prompt_tokens": 20, "completion_tokens": 1, "total_tokens": 21}
                }"#,
            )
            .create_async()
            .await;

        let client = OpenAiClient::new("sk-test", "gpt-3.5-turbo").with_api_base(server.url());
        let request = CompletionRequest::new("a funny movie").with_system("Name the genre");
        let response = client.complete(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, "comedy");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.usage.input_tokens, 20);
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new("sk-test", "gpt-3.5-turbo").with_api_base(server.url());
        let err = client
            .complete(CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected an API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_sends_zero_temperature() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "temperature": 0.0
            })))
            .with_status(200)
            .with_body(r#"{"model":"gpt-3.5-turbo","choices":[{"message":{"content":"none"}}]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new("sk-test", "gpt-3.5-turbo").with_api_base(server.url());
        let request = CompletionRequest::new("x").with_system("Name the actor or say none");
        assert_eq!(request.temperature, 0.0);
        let response = client.complete(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, "none");
    }

    #[tokio::test]
    async fn test_complete_without_choices_is_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"model":"gpt-3.5-turbo","choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new("sk-test", "gpt-3.5-turbo").with_api_base(server.url());
        let err = client
            .complete(CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_complete_malformed_body_is_json_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = OpenAiClient::new("sk-test", "gpt-3.5-turbo").with_api_base(server.url());
        let err = client
            .complete(CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Json(_)));
    }
}
