use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `MOVIE_EXPERT_TMDB__BEARER_TOKEN`
pub const ENV_PREFIX: &str = "MOVIE_EXPERT_";

/// Environment variable holding an explicit config file path
pub const CONFIG_PATH_ENV: &str = "MOVIE_EXPERT_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "movie-expert.toml";

/// Pick the config file to load.
///
/// An explicit `MOVIE_EXPERT_CONFIG` always wins (and must exist, checked by
/// [`load_config`]); otherwise `movie-expert.toml` is used when present.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.exists().then_some(default)
}

/// Load configuration from an optional file with environment variable overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        // Variable names the chat plugin has always read
        .merge(
            Env::raw()
                .only(&["OPEN_AI_KEY"])
                .map(|_| "llm.api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["TMDB_BEARER_TOKEN"])
                .map(|_| "tmdb.bearer_token".into()),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
