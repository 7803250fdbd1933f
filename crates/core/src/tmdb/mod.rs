//! TMDB integration: entity search, movie discovery, and the resolver that
//! turns free-text names into TMDB identifiers.

mod client;
mod resolver;
mod types;

pub use client::TmdbClient;
pub use resolver::EntityResolver;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the metadata API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Bearer token rejected (401).
    #[error("Metadata API rejected the bearer token")]
    Unauthorized,

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing token, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Read access to a movie metadata provider.
#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Search entities of one type; results keep the provider's ranking.
    async fn search(
        &self,
        entity_type: EntityType,
        query: &str,
    ) -> Result<Vec<SearchEntity>, CatalogError>;

    /// Fetch a fully assembled discovery URL.
    async fn discover(&self, url: &str) -> Result<DiscoverPage, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::ApiError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
        assert_eq!(
            CatalogError::RateLimitExceeded.to_string(),
            "Rate limit exceeded, please wait before retrying"
        );
    }
}
