//! Interactive chat loop.
//!
//! Reads one request per line, turns it into a discovery URL, optionally
//! fetches the matching movies, and reports the token cost of the turn.
//! A failing turn prints an apology and the loop carries on; only I/O errors
//! on the console itself end the session early.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::config::{OutputFormat, SessionConfig};
use crate::discovery::{DiscoveryQuery, DiscoveryQueryBuilder};
use crate::tmdb::{CatalogError, DiscoverPage, DiscoveredMovie, MetadataCatalog};

pub const PROMPT: &str = "You: ";
pub const APOLOGY: &str = "Sorry, there was an error processing your request. Please try again.";
pub const FETCH_FAILED: &str = "Sorry, I couldn't fetch the matching movies right now.";
pub const NO_MATCHES: &str = "No movies matched.";
pub const FAREWELL: &str = "Thank you for using the Movie Expert Chat. Goodbye!";

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render results: {0}")]
    Render(#[from] serde_json::Error),
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Non-blank requests handled.
    pub turns: usize,
    /// Turns that printed the apology.
    pub failed_turns: usize,
    /// Tokens estimated over all turns.
    pub total_tokens: usize,
}

/// What one turn produced before anything is written out.
struct TurnOutcome {
    query: DiscoveryQuery,
    page: Option<Result<DiscoverPage, CatalogError>>,
}

/// The read-eval-print loop around [`DiscoveryQueryBuilder`].
pub struct Session {
    builder: DiscoveryQueryBuilder,
    catalog: Option<Arc<dyn MetadataCatalog>>,
    config: SessionConfig,
}

impl Session {
    pub fn new(builder: DiscoveryQueryBuilder, config: SessionConfig) -> Self {
        Self {
            builder,
            catalog: None,
            config,
        }
    }

    /// Catalog used to fetch discovery URLs when `fetch_results` is on.
    pub fn with_catalog(mut self, catalog: Arc<dyn MetadataCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn greeting(&self) -> String {
        format!(
            "Welcome to the Movie Expert Chat! Give me a summary of what you want to watch \
             and I'll give you some results. Type '{}' to exit anytime.",
            self.config.exit_sentinel
        )
    }

    /// True if `line` ends the session.
    pub fn is_exit(&self, line: &str) -> bool {
        let sentinel = self.config.exit_sentinel.trim();
        line.trim().eq_ignore_ascii_case(sentinel)
    }

    /// Run until the exit sentinel or end of input.
    pub async fn run<R, W>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<SessionSummary, SessionError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut summary = SessionSummary::default();

        write_line(&mut output, &self.greeting()).await?;

        let mut line = String::new();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            line.clear();
            if input.read_line(&mut line).await? == 0 {
                debug!("Input closed, ending session");
                break;
            }

            if self.is_exit(&line) {
                break;
            }

            let request = line.trim();
            if request.is_empty() {
                continue;
            }

            summary.turns += 1;

            let turn = AssertUnwindSafe(self.process(request)).catch_unwind();
            match turn.await {
                Ok(outcome) => {
                    summary.total_tokens += outcome.query.total_tokens;
                    if self.render(&outcome, &mut output).await? {
                        summary.failed_turns += 1;
                    }
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!("Turn aborted unexpectedly: {}", message);
                    summary.failed_turns += 1;
                    write_line(&mut output, APOLOGY).await?;
                }
            }
        }

        write_line(&mut output, FAREWELL).await?;
        output.flush().await?;

        info!(
            "Session finished: {} turn(s), {} failed, ~{} tokens",
            summary.turns, summary.failed_turns, summary.total_tokens
        );

        Ok(summary)
    }

    async fn process(&self, request: &str) -> TurnOutcome {
        let query = self.builder.build(request).await;

        let page = match self.catalog {
            Some(ref catalog) if self.config.fetch_results => {
                Some(catalog.discover(&query.url).await)
            }
            _ => None,
        };

        TurnOutcome { query, page }
    }

    /// Write a turn's output. Returns true when the apology was shown.
    async fn render<W>(&self, outcome: &TurnOutcome, output: &mut W) -> Result<bool, SessionError>
    where
        W: AsyncWrite + Unpin,
    {
        let query = &outcome.query;

        let header = format!("{}: {}", self.config.character_name, query.url);
        write_line(output, &header).await?;

        match outcome.page {
            Some(Ok(ref page)) => {
                for line in self.format_page(page)? {
                    write_line(output, &line).await?;
                }
            }
            Some(Err(ref e)) => {
                warn!("Discovery fetch failed for {}: {}", query.url, e);
                write_line(output, FETCH_FAILED).await?;
            }
            None => {}
        }

        if query.is_degraded() {
            write_line(output, APOLOGY).await?;
        }

        write_line(
            output,
            &format!("(This interaction used {} tokens.)", query.total_tokens),
        )
        .await?;

        Ok(query.is_degraded())
    }

    fn format_page(&self, page: &DiscoverPage) -> Result<Vec<String>, SessionError> {
        let shown: Vec<&DiscoveredMovie> =
            page.results.iter().take(self.config.max_results).collect();

        if shown.is_empty() {
            return Ok(vec![NO_MATCHES.to_string()]);
        }

        match self.config.output {
            OutputFormat::Summary => Ok(shown.into_iter().map(format_movie).collect()),
            OutputFormat::Json => Ok(vec![serde_json::to_string_pretty(&shown)?]),
        }
    }
}

/// `  - Title (Year) ★ 7.5`, leaving out whatever is unknown.
pub fn format_movie(movie: &DiscoveredMovie) -> String {
    let mut line = format!("  - {}", movie.title);
    if let Some(year) = movie.year() {
        line.push_str(&format!(" ({})", year));
    }
    if let Some(vote) = movie.vote_average {
        line.push_str(&format!(" ★ {:.1}", vote));
    }
    line
}

async fn write_line<W>(output: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
