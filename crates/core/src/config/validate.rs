use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - LLM API key is present
/// - TMDB bearer token is present
/// - TMDB URLs are absolute http(s) URLs
/// - Prompts and the exit sentinel are non-empty
/// - Timeouts are non-zero and temperature is in range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // LLM validation
    if is_blank(config.llm.api_key.as_deref()) {
        return Err(ConfigError::MissingValue("llm.api_key"));
    }
    if config.llm.model.trim().is_empty() {
        return Err(ConfigError::MissingValue("llm.model"));
    }
    if config.llm.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "llm.timeout_secs cannot be 0".to_string(),
        ));
    }
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "llm.temperature must be between 0.0 and 2.0, got {}",
            config.llm.temperature
        )));
    }
    if let Some(ref api_base) = config.llm.api_base {
        check_http_url("llm.api_base", api_base)?;
    }

    // TMDB validation
    if is_blank(config.tmdb.bearer_token.as_deref()) {
        return Err(ConfigError::MissingValue("tmdb.bearer_token"));
    }
    check_http_url("tmdb.base_url", &config.tmdb.base_url)?;
    check_http_url("tmdb.discover_url", &config.tmdb.discover_base_url())?;
    if config.tmdb.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "tmdb.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Prompt validation
    if config.prompts.genre.trim().is_empty() {
        return Err(ConfigError::MissingValue("prompts.genre"));
    }
    if config.prompts.actor.trim().is_empty() {
        return Err(ConfigError::MissingValue("prompts.actor"));
    }
    if config.prompts.no_actor_sentinel.is_empty() {
        return Err(ConfigError::MissingValue("prompts.no_actor_sentinel"));
    }

    // Session validation
    if config.session.exit_sentinel.trim().is_empty() {
        return Err(ConfigError::MissingValue("session.exit_sentinel"));
    }

    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn check_http_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be an absolute http(s) URL, got '{}'",
            field, url
        )))
    }
}
