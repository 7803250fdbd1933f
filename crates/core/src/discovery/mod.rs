//! Discovery query assembly.
//!
//! ```text
//! utterance ──► genre prompt ──► with_genres=<text>
//!           └─► actor prompt ──► EntityResolver(person) ──► with_people=<id>
//!                                         │
//!                         base_url + QueryParams ──► discovery URL
//! ```

mod builder;
mod params;

pub use builder::{DiscoveryQuery, DiscoveryQueryBuilder, QueryIssue};
pub use params::{decode_component, encode_component, QueryParams, WITH_GENRES, WITH_PEOPLE};
