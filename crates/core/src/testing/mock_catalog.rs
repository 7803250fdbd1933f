//! Mock metadata catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::tmdb::{CatalogError, DiscoverPage, EntityType, MetadataCatalog, SearchEntity};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    Search {
        entity_type: EntityType,
        query: String,
    },
    Discover {
        url: String,
    },
}

/// Mock implementation of the MetadataCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results per (type, query)
/// - Return a configurable discovery page
/// - Track queries for assertions
/// - Simulate failures
///
/// Unknown searches return an empty result list; discovery without a
/// configured page returns an empty page.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    /// Search results by (entity type, exact query).
    search_results: Arc<RwLock<HashMap<(EntityType, String), Vec<SearchEntity>>>>,
    /// Page returned by every discovery call.
    discover_page: Arc<RwLock<Option<DiscoverPage>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// If set, discovery panics with this message.
    discover_panic: Arc<RwLock<Option<String>>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the results returned for one search.
    pub async fn set_search_results(
        &self,
        entity_type: EntityType,
        query: &str,
        results: Vec<SearchEntity>,
    ) {
        self.search_results
            .write()
            .await
            .insert((entity_type, query.to_string()), results);
    }

    /// Set the page returned by discovery calls.
    pub async fn set_discover_page(&self, page: DiscoverPage) {
        *self.discover_page.write().await = Some(page);
    }

    /// Make discovery calls panic.
    pub async fn panic_on_discover(&self, message: &str) {
        *self.discover_panic.write().await = Some(message.to_string());
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    /// Record a query.
    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl MetadataCatalog for MockCatalog {
    async fn search(
        &self,
        entity_type: EntityType,
        query: &str,
    ) -> Result<Vec<SearchEntity>, CatalogError> {
        self.record(RecordedCatalogQuery::Search {
            entity_type,
            query: query.to_string(),
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .search_results
            .read()
            .await
            .get(&(entity_type, query.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn discover(&self, url: &str) -> Result<DiscoverPage, CatalogError> {
        self.record(RecordedCatalogQuery::Discover {
            url: url.to_string(),
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let panic_message = self.discover_panic.read().await.clone();
        if let Some(message) = panic_message {
            panic!("{}", message);
        }

        Ok(self.discover_page.read().await.clone().unwrap_or_default())
    }
}
