//! Turns one user utterance into a filtered discovery URL.

use tracing::{debug, info, warn};

use super::params::{QueryParams, WITH_GENRES, WITH_PEOPLE};
use crate::config::PromptConfig;
use crate::llm::{LlmError, LlmQueryClient};
use crate::tmdb::{EntityId, EntityResolver, EntityType};

/// A step of the pipeline that had to be skipped.
#[derive(Debug, Clone)]
pub enum QueryIssue {
    /// The genre extraction call failed; `with_genres` was omitted.
    GenreUnavailable(LlmError),
    /// The actor extraction call failed; `with_people` was omitted.
    ActorUnavailable(LlmError),
    /// An actor was named but could not be resolved to an id.
    ActorNotFound(String),
}

impl QueryIssue {
    /// True when the model provider itself failed.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            QueryIssue::GenreUnavailable(_) | QueryIssue::ActorUnavailable(_)
        )
    }
}

/// Result of building one discovery query.
#[derive(Debug, Clone)]
pub struct DiscoveryQuery {
    /// Base URL with the parameters appended.
    pub url: String,
    pub params: QueryParams,
    /// Sum of token estimates over the LLM calls that succeeded.
    pub total_tokens: usize,
    pub genre: Option<String>,
    pub actor: Option<String>,
    pub actor_id: Option<EntityId>,
    pub issues: Vec<QueryIssue>,
}

impl DiscoveryQuery {
    /// True when at least one LLM call failed during the build.
    pub fn is_degraded(&self) -> bool {
        self.issues.iter().any(QueryIssue::is_provider_failure)
    }
}

/// Orchestrates attribute extraction and entity resolution.
///
/// Every step degrades independently: a failed call drops its own parameter
/// and contributes no tokens, and `build` itself cannot fail.
pub struct DiscoveryQueryBuilder {
    llm: LlmQueryClient,
    resolver: EntityResolver,
    prompts: PromptConfig,
    base_url: String,
}

impl DiscoveryQueryBuilder {
    pub fn new(
        llm: LlmQueryClient,
        resolver: EntityResolver,
        prompts: PromptConfig,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            resolver,
            prompts,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the discovery URL for `utterance`.
    pub async fn build(&self, utterance: &str) -> DiscoveryQuery {
        let mut params = QueryParams::new();
        let mut issues = Vec::new();
        let mut total_tokens = 0;

        // Genre
        let genre = match self.llm.complete(&self.prompts.genre, utterance).await {
            Ok(answer) => {
                total_tokens += answer.tokens;
                if answer.text.is_empty() {
                    debug!("Genre extraction returned no text");
                    None
                } else {
                    params.push(WITH_GENRES, answer.text.clone());
                    Some(answer.text)
                }
            }
            Err(e) => {
                warn!("Genre extraction failed, omitting {}: {}", WITH_GENRES, e);
                issues.push(QueryIssue::GenreUnavailable(e));
                None
            }
        };

        // Actor
        let actor = match self.llm.complete(&self.prompts.actor, utterance).await {
            Ok(answer) => {
                total_tokens += answer.tokens;
                if answer.text == self.prompts.no_actor_sentinel {
                    debug!("No actor mentioned");
                    None
                } else if answer.text.is_empty() {
                    debug!("Actor extraction returned no text");
                    None
                } else {
                    Some(answer.text)
                }
            }
            Err(e) => {
                warn!("Actor extraction failed, omitting {}: {}", WITH_PEOPLE, e);
                issues.push(QueryIssue::ActorUnavailable(e));
                None
            }
        };

        let actor_id = match actor {
            Some(ref name) => {
                let id = self.resolver.resolve(EntityType::Person, name).await;
                match id {
                    Some(id) => params.push(WITH_PEOPLE, id.to_string()),
                    None => {
                        info!("Actor '{}' not found, omitting {}", name, WITH_PEOPLE);
                        issues.push(QueryIssue::ActorNotFound(name.clone()));
                    }
                }
                id
            }
            None => None,
        };

        let url = params.append_to(&self.base_url);

        info!(
            "Built discovery query with {} parameter(s), ~{} tokens",
            params.len(),
            total_tokens
        );

        DiscoveryQuery {
            url,
            params,
            total_tokens,
            genre,
            actor,
            actor_id,
            issues,
        }
    }
}
