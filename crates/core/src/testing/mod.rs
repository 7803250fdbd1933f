//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits
//! (LLM provider, metadata catalog), allowing the whole chat pipeline to be
//! exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use movie_expert_core::testing::{fixtures, MockCatalog, MockLlmClient};
//!
//! let llm = MockLlmClient::new();
//! llm.respond_to(fixtures::GENRE_PROMPT, "comedy").await;
//!
//! let catalog = MockCatalog::new();
//! let hanks = vec![fixtures::person(31, "Tom Hanks")];
//! catalog.set_search_results(EntityType::Person, "Tom Hanks", hanks).await;
//! ```

mod mock_catalog;
mod mock_llm;

pub use mock_catalog::{MockCatalog, RecordedCatalogQuery};
pub use mock_llm::MockLlmClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::PromptConfig;
    use crate::tmdb::{DiscoverPage, DiscoveredMovie, EntityId, SearchEntity};

    /// Genre instruction used by [`prompts`].
    pub const GENRE_PROMPT: &str = "Name the genre";
    /// Actor instruction used by [`prompts`].
    pub const ACTOR_PROMPT: &str = "Name the actor or say none";

    /// Short, recognizable prompts for scripting mocks.
    pub fn prompts() -> PromptConfig {
        PromptConfig {
            genre: GENRE_PROMPT.to_string(),
            actor: ACTOR_PROMPT.to_string(),
            no_actor_sentinel: "none".to_string(),
        }
    }

    /// Create a person search result.
    pub fn person(id: EntityId, name: &str) -> SearchEntity {
        SearchEntity {
            id,
            name: name.to_string(),
            known_for_department: Some("Acting".to_string()),
            popularity: Some(50.0),
        }
    }

    /// Create a discovered movie with reasonable defaults.
    pub fn movie(id: EntityId, title: &str, year: u32) -> DiscoveredMovie {
        DiscoveredMovie {
            id,
            title: title.to_string(),
            original_title: None,
            release_date: Some(format!("{}-06-15", year)),
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
            vote_average: Some(7.5),
            genre_ids: vec![35],
            poster_path: None,
        }
    }

    /// Wrap movies in a single result page.
    pub fn page(movies: Vec<DiscoveredMovie>) -> DiscoverPage {
        let total = movies.len() as u32;
        DiscoverPage {
            page: 1,
            results: movies,
            total_pages: 1,
            total_results: total,
        }
    }
}
