//! Mock LLM client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Error(LlmError),
    Panic(String),
}

/// Mock implementation of the LlmClient trait.
///
/// Answers are scripted per system prompt, so one mock can stand in for both
/// the genre and the actor extraction calls:
/// - Return a fixed text for a system prompt
/// - Fail with a given error for a system prompt
/// - Record every request for assertions
///
/// A request whose system prompt has no script fails with
/// `LlmError::NotConfigured`.
///
/// # Example
///
/// ```rust,ignore
/// use movie_expert_core::testing::MockLlmClient;
///
/// let llm = MockLlmClient::new();
/// llm.respond_to("Name the genre", "comedy").await;
/// llm.fail_on("Name the actor", LlmError::Http("offline".into())).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    scripts: Arc<RwLock<HashMap<String, Scripted>>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockLlmClient {
    /// Create a mock with no scripted answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests carrying `system` with `text`.
    pub async fn respond_to(&self, system: &str, text: &str) {
        self.scripts
            .write()
            .await
            .insert(system.to_string(), Scripted::Text(text.to_string()));
    }

    /// Fail requests carrying `system` with `error`.
    pub async fn fail_on(&self, system: &str, error: LlmError) {
        self.scripts
            .write()
            .await
            .insert(system.to_string(), Scripted::Error(error));
    }

    /// Panic while serving requests carrying `system`.
    pub async fn panic_on(&self, system: &str, message: &str) {
        self.scripts
            .write()
            .await
            .insert(system.to_string(), Scripted::Panic(message.to_string()));
    }

    /// Get all recorded requests.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of completions requested.
    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let system = request.system.clone().unwrap_or_default();
        self.requests.write().await.push(request);

        let script = self.scripts.read().await.get(&system).cloned();

        match script {
            Some(Scripted::Text(text)) => Ok(CompletionResponse {
                usage: LlmUsage {
                    input_tokens: 10,
                    output_tokens: text.split_whitespace().count() as u32,
                },
                text,
                model: "mock-model".to_string(),
            }),
            Some(Scripted::Error(err)) => Err(err),
            Some(Scripted::Panic(message)) => panic!("{}", message),
            None => Err(LlmError::NotConfigured(format!(
                "no scripted answer for system prompt '{}'",
                system
            ))),
        }
    }
}
