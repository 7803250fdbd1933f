//! TMDB (The Movie Database) API client.
//!
//! Authenticates with a v4 read access token sent as a bearer header.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{DiscoverPage, EntityType, SearchEntity, SearchResponse};
use super::{CatalogError, MetadataCatalog};
use crate::config::TmdbConfig;

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    bearer_token: String,
    language: String,
    include_adult: bool,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: &TmdbConfig) -> Result<Self, CatalogError> {
        let bearer_token = config
            .bearer_token
            .as_ref()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .ok_or_else(|| {
                CatalogError::NotConfigured("TMDB bearer token is required".to_string())
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token,
            language: config.language.clone(),
            include_adult: config.include_adult,
        })
    }

    /// URL of a `/search/{type}` request with the query percent-encoded.
    pub fn search_url(&self, entity_type: EntityType, query: &str) -> String {
        format!(
            "{}/search/{}?query={}&include_adult={}&language={}&page=1",
            self.base_url,
            entity_type.as_path(),
            urlencoding::encode(query),
            self.include_adult,
            urlencoding::encode(&self.language)
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .header("accept", "application/json")
            .send()
            .await?;

        let response = check_status(response, url).await?;

        response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response, CatalogError> {
    let status = response.status();
    if status == 401 {
        return Err(CatalogError::Unauthorized);
    }
    if status == 404 {
        return Err(CatalogError::NotFound(url.to_string()));
    }
    if status == 429 {
        return Err(CatalogError::RateLimitExceeded);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response)
}

#[async_trait]
impl MetadataCatalog for TmdbClient {
    async fn search(
        &self,
        entity_type: EntityType,
        query: &str,
    ) -> Result<Vec<SearchEntity>, CatalogError> {
        let url = self.search_url(entity_type, query);

        debug!("TMDB {} search: query='{}'", entity_type, query);

        let search_result: SearchResponse = self.get_json(&url, "search").await?;
        Ok(search_result.results)
    }

    async fn discover(&self, url: &str) -> Result<DiscoverPage, CatalogError> {
        debug!("TMDB discover: {}", url);

        self.get_json(url, "discover").await
    }
}
