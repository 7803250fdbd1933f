use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_expert_core::llm::mask_api_key;
use movie_expert_core::{
    create_query_client, load_config, resolve_config_path, validate_config, DiscoveryQueryBuilder,
    EntityResolver, MetadataCatalog, SanitizedConfig, Session, TmdbClient,
};

/// Selects JSON log lines instead of the human-readable format.
const LOG_FORMAT_ENV: &str = "MOVIE_EXPERT_LOG_FORMAT";

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    init_logging();

    // Panics inside a turn are recovered by the session; keep them in the log
    std::panic::set_hook(Box::new(|info| error!("{}", info)));

    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout belongs to the chat
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run() -> Result<()> {
    let config_path = resolve_config_path();
    match config_path {
        Some(ref path) => info!("Loading configuration from {:?}", path),
        None => info!("No configuration file, using defaults and environment"),
    }

    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );
    if let Some(ref key) = config.llm.api_key {
        info!("Using LLM API key {}", mask_api_key(key));
    }

    let llm = create_query_client(&config.llm).context("Failed to create LLM client")?;
    info!("LLM client: {}", llm.describe());

    let tmdb = TmdbClient::new(&config.tmdb).context("Failed to create TMDB client")?;
    let catalog: Arc<dyn MetadataCatalog> = Arc::new(tmdb);

    let builder = DiscoveryQueryBuilder::new(
        llm,
        EntityResolver::new(Arc::clone(&catalog)),
        config.prompts.clone(),
        config.tmdb.discover_base_url(),
    );
    info!("Discovery base URL: {}", builder.base_url());

    let session = Session::new(builder, config.session.clone()).with_catalog(catalog);

    let summary = session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Chat session failed")?;

    info!(
        "Goodbye after {} turn(s) and ~{} tokens",
        summary.turns, summary.total_tokens
    );

    Ok(())
}
