pub mod config;
pub mod discovery;
pub mod llm;
pub mod session;
pub mod testing;
pub mod tmdb;

pub use config::{
    load_config, load_config_from_str, resolve_config_path, validate_config, Config, ConfigError,
    SanitizedConfig,
};
pub use discovery::{DiscoveryQuery, DiscoveryQueryBuilder, QueryIssue, QueryParams};
pub use llm::{create_query_client, estimate_tokens, LlmClient, LlmError, LlmQueryClient};
pub use session::{Session, SessionError, SessionSummary};
pub use tmdb::{CatalogError, EntityResolver, EntityType, MetadataCatalog, TmdbClient};
