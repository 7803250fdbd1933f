//! LLM access: the provider client, token estimation, and the query client
//! the discovery pipeline talks to.
//!
//! ```text
//! LlmQueryClient ──► Arc<dyn LlmClient> ──► OpenAiClient
//! ```

mod client;
mod openai;
mod query;
mod tokens;

pub use client::{
    mask_api_key, CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage,
};
pub use openai::OpenAiClient;
pub use query::{LlmAnswer, LlmQueryClient};
pub use tokens::estimate_tokens;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, LlmConfig, LlmProvider};

/// Build the configured provider client.
pub fn create_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, ConfigError> {
    let timeout = Duration::from_secs(u64::from(config.timeout_secs));

    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::OpenAi => {
            let api_key = required_key(config)?;
            let model = config.model.clone();
            let mut client = OpenAiClient::new(api_key, model).with_timeout(timeout);
            if let Some(ref api_base) = config.api_base {
                client = client.with_api_base(api_base.clone());
            }
            Arc::new(client)
        }
    };

    Ok(client)
}

/// Build the query client used by the discovery pipeline.
pub fn create_query_client(config: &LlmConfig) -> Result<LlmQueryClient, ConfigError> {
    let client = create_llm_client(config)?;
    Ok(LlmQueryClient::new(client)
        .with_max_tokens(config.max_tokens)
        .with_temperature(config.temperature))
}

fn required_key(config: &LlmConfig) -> Result<String, ConfigError> {
    config
        .api_key
        .as_ref()
        .filter(|k| !k.trim().is_empty())
        .cloned()
        .ok_or(ConfigError::MissingValue("llm.api_key"))
}
