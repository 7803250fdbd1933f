//! First-match entity resolution.

use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{EntityId, EntityType};
use super::MetadataCatalog;

/// Turns a free-text name into a TMDB identifier.
///
/// Always takes the provider's top-ranked result; there is no disambiguation
/// or fuzzy scoring. Every failure collapses into `None`.
#[derive(Clone)]
pub struct EntityResolver {
    catalog: Arc<dyn MetadataCatalog>,
}

impl EntityResolver {
    pub fn new(catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve `query` to the id of the first search result, if any.
    pub async fn resolve(&self, entity_type: EntityType, query: &str) -> Option<EntityId> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        match self.catalog.search(entity_type, query).await {
            Ok(results) => match results.into_iter().next() {
                Some(first) => {
                    debug!(
                        "Resolved {} '{}' to id {} ({})",
                        entity_type, query, first.id, first.name
                    );
                    Some(first.id)
                }
                None => {
                    debug!("No {} found for '{}'", entity_type, query);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to resolve {} '{}': {}", entity_type, query, e);
                None
            }
        }
    }
}
