//! Types for TMDB search and discovery responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// TMDB numeric identifier.
pub type EntityId = u64;

/// The `/search/{type}` endpoints the resolver can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Cast and crew, backing `with_people`.
    Person,
}

impl EntityType {
    /// Path segment under `/search/`.
    pub fn as_path(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// One record from a search result list.
///
/// People carry `name`; `title` is accepted for title-bearing records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchEntity {
    pub id: EntityId,
    #[serde(default, alias = "title")]
    pub name: String,
    /// Department a person is known for (e.g. "Acting").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_for_department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
}

/// Envelope of a `/search/{type}` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchEntity>,
}

/// A movie from a discovery result page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveredMovie {
    /// TMDB movie ID.
    pub id: EntityId,
    /// Movie title.
    pub title: String,
    /// Original title (in original language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Movie overview/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl DiscoveredMovie {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

/// One page of `/discover/movie` results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<DiscoveredMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}
