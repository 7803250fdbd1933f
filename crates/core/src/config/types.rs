use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub prompts: PromptConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LlmProvider {
    /// OpenAI chat completions API (or any compatible server via `api_base`).
    #[default]
    #[serde(rename = "openai", alias = "open_ai")]
    OpenAi,
}

/// LLM client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider.
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name/identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key (required for hosted providers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL (for proxies or self-hosted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Maximum tokens for completions.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
            api_key: None,
            api_base: None,
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_tokens() -> u32 {
    256
}

/// TMDB metadata API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// v4 read access token, sent as `Authorization: Bearer ...`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    /// API base URL (default: https://api.themoviedb.org/3)
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// Discovery endpoint including its fixed query string.
    /// Defaults to `{base_url}/discover/movie?...` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discover_url: Option<String>,
    /// Language passed to search requests
    #[serde(default = "default_language")]
    pub language: String,
    /// Whether adult titles may appear in search results
    #[serde(default)]
    pub include_adult: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            base_url: default_tmdb_base_url(),
            discover_url: None,
            language: default_language(),
            include_adult: false,
            timeout_secs: default_timeout(),
        }
    }
}

impl TmdbConfig {
    /// The discovery base URL that query parameters get appended to.
    pub fn discover_base_url(&self) -> String {
        match &self.discover_url {
            Some(url) => url.clone(),
            None => format!(
                "{}/discover/movie?include_adult={}&include_video=false&language={}&page=1&sort_by=popularity.desc",
                self.base_url.trim_end_matches('/'),
                self.include_adult,
                self.language
            ),
        }
    }
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

/// System instructions used to extract attributes from a user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Instruction for the genre extraction call
    #[serde(default = "default_genre_prompt")]
    pub genre: String,
    /// Instruction for the actor extraction call
    #[serde(default = "default_actor_prompt")]
    pub actor: String,
    /// Literal the actor call answers with when no actor is mentioned.
    /// Compared case-sensitively.
    #[serde(default = "default_no_actor_sentinel")]
    pub no_actor_sentinel: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            genre: default_genre_prompt(),
            actor: default_actor_prompt(),
            no_actor_sentinel: default_no_actor_sentinel(),
        }
    }
}

fn default_genre_prompt() -> String {
    "You are a movie expert. Read the user's request and answer with the single movie genre \
     that best matches it, in lowercase, with no punctuation and no other text."
        .to_string()
}

fn default_actor_prompt() -> String {
    "You are a movie expert. If the user's request mentions an actor or actress, answer with \
     that person's full name only. If no actor is mentioned, answer with exactly: none"
        .to_string()
}

fn default_no_actor_sentinel() -> String {
    "none".to_string()
}

/// How discovered movies are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One line per movie
    #[default]
    Summary,
    /// The parsed result page as pretty JSON
    Json,
}

/// Interactive session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name shown in front of replies
    #[serde(default = "default_character_name")]
    pub character_name: String,
    /// Line that ends the session (case-insensitive)
    #[serde(default = "default_exit_sentinel")]
    pub exit_sentinel: String,
    /// Fetch the discovery URL and print its results
    #[serde(default = "default_true")]
    pub fetch_results: bool,
    /// Maximum number of movies printed per turn
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            character_name: default_character_name(),
            exit_sentinel: default_exit_sentinel(),
            fetch_results: true,
            max_results: default_max_results(),
            output: OutputFormat::default(),
        }
    }
}

fn default_character_name() -> String {
    "Movie Expert".to_string()
}

fn default_exit_sentinel() -> String {
    "done".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_results() -> usize {
    10
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub llm: SanitizedLlmConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub discover_url: String,
    pub bearer_token_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            llm: SanitizedLlmConfig {
                provider: config.llm.provider,
                model: config.llm.model.clone(),
                api_key_configured: config.llm.api_key.as_ref().is_some_and(|k| !k.is_empty()),
                api_base: config.llm.api_base.clone(),
                timeout_secs: config.llm.timeout_secs,
            },
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                discover_url: config.tmdb.discover_base_url(),
                bearer_token_configured: config
                    .tmdb
                    .bearer_token
                    .as_ref()
                    .is_some_and(|t| !t.is_empty()),
                timeout_secs: config.tmdb.timeout_secs,
            },
            session: config.session.clone(),
        }
    }
}
