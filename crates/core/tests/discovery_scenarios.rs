//! Discovery pipeline integration tests.
//!
//! The LLM is scripted with `MockLlmClient`; person search runs through the
//! real `TmdbClient` against a local mockito server.

use std::sync::Arc;

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

use movie_expert_core::{
    config::TmdbConfig,
    discovery::{decode_component, WITH_GENRES, WITH_PEOPLE},
    estimate_tokens,
    llm::LlmError,
    testing::{fixtures, MockLlmClient},
    tmdb::EntityId,
    DiscoveryQueryBuilder, EntityResolver, LlmQueryClient, QueryIssue, TmdbClient,
};

/// Test helper wiring the builder to a mock LLM and a mock TMDB server.
struct TestHarness {
    server: ServerGuard,
    llm: Arc<MockLlmClient>,
    builder: DiscoveryQueryBuilder,
    base_url: String,
}

impl TestHarness {
    async fn new() -> Self {
        let server = mockito::Server::new_async().await;
        let config = TmdbConfig {
            bearer_token: Some("tmdb-token".to_string()),
            base_url: server.url(),
            ..Default::default()
        };
        let base_url = config.discover_base_url();

        let llm = Arc::new(MockLlmClient::new());
        let tmdb = TmdbClient::new(&config).expect("Failed to create TMDB client");
        let catalog = Arc::new(tmdb);
        let builder = DiscoveryQueryBuilder::new(
            LlmQueryClient::new(llm.clone()),
            EntityResolver::new(catalog),
            fixtures::prompts(),
            base_url.clone(),
        );

        Self {
            server,
            llm,
            builder,
            base_url,
        }
    }

    async fn script(&self, genre: Result<&str, LlmError>, actor: Result<&str, LlmError>) {
        match genre {
            Ok(text) => self.llm.respond_to(fixtures::GENRE_PROMPT, text).await,
            Err(e) => self.llm.fail_on(fixtures::GENRE_PROMPT, e).await,
        }
        match actor {
            Ok(text) => self.llm.respond_to(fixtures::ACTOR_PROMPT, text).await,
            Err(e) => self.llm.fail_on(fixtures::ACTOR_PROMPT, e).await,
        }
    }

    async fn person_search(&mut self, name: &str, people: &[(EntityId, &str)]) -> Mock {
        let body = people_page(people);
        self.server
            .mock("GET", "/search/person")
            .match_header("authorization", "Bearer tmdb-token")
            .match_query(Matcher::UrlEncoded("query".into(), name.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    async fn no_person_search(&mut self) -> Mock {
        self.server
            .mock("GET", "/search/person")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await
    }
}

/// A single-page `/search/person` response body.
fn people_page(people: &[(EntityId, &str)]) -> String {
    let results: Vec<_> = people
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": people.len(),
    })
    .to_string()
}

fn provider_down() -> LlmError {
    LlmError::Api {
        status: 503,
        message: "overloaded".to_string(),
    }
}

#[tokio::test]
async fn test_genre_and_actor_both_filter() {
    let mut h = TestHarness::new().await;
    h.script(Ok("comedy"), Ok("Tom Hanks")).await;
    let people = [(31, "Tom Hanks"), (99, "Tom Hanks Fan")];
    let search = h.person_search("Tom Hanks", &people).await;

    let query = h.builder.build("I want a funny movie with Tom Hanks").await;

    search.assert_async().await;
    assert_eq!(
        query.url,
        format!("{}&with_genres=comedy&with_people=31", h.base_url)
    );
    assert!(query.issues.is_empty());
}

#[tokio::test]
async fn test_no_actor_skips_person_search() {
    let mut h = TestHarness::new().await;
    h.script(Ok("horror"), Ok("none")).await;
    let search = h.no_person_search().await;

    let query = h.builder.build("something scary").await;

    search.assert_async().await;
    assert!(query.url.contains("with_genres=horror"));
    assert!(!query.url.contains(WITH_PEOPLE));
}

#[tokio::test]
async fn test_genre_failure_keeps_actor() {
    let mut h = TestHarness::new().await;
    h.script(Err(provider_down()), Ok("Meryl Streep")).await;
    let streep = [(5064, "Meryl Streep")];
    let _search = h.person_search("Meryl Streep", &streep).await;

    let query = h.builder.build("anything with Meryl Streep").await;

    assert_eq!(query.url, format!("{}&with_people=5064", h.base_url));
    assert!(!query.url.contains(WITH_GENRES));
    assert!(query.is_degraded());
}

#[tokio::test]
async fn test_actor_failure_keeps_genre() {
    let mut h = TestHarness::new().await;
    let reset = LlmError::Http("connection reset".to_string());
    h.script(Ok("comedy"), Err(reset)).await;
    let search = h.no_person_search().await;

    let utterance = "a funny movie with Tom Hanks";
    let query = h.builder.build(utterance).await;

    search.assert_async().await;
    assert_eq!(query.url, format!("{}&with_genres=comedy", h.base_url));
    match query.issues.as_slice() {
        [QueryIssue::ActorUnavailable(_)] => {}
        other => panic!("unexpected issues: {:?}", other),
    }
    let expected = estimate_tokens(fixtures::GENRE_PROMPT)
        + estimate_tokens(utterance)
        + estimate_tokens("comedy");
    assert_eq!(query.total_tokens, expected);
}

#[tokio::test]
async fn test_both_calls_failing_leave_base_url() {
    let h = TestHarness::new().await;
    let reset = LlmError::Http("connection reset".to_string());
    h.script(Err(provider_down()), Err(reset)).await;

    let query = h.builder.build("anything").await;

    assert_eq!(query.url, h.base_url);
    assert_eq!(query.total_tokens, 0);
}

#[tokio::test]
async fn test_unknown_actor_is_omitted() {
    let mut h = TestHarness::new().await;
    h.script(Ok("drama"), Ok("Ima Nobody")).await;
    let search = h.person_search("Ima Nobody", &[]).await;

    let query = h.builder.build("a drama with Ima Nobody").await;

    search.assert_async().await;
    assert_eq!(query.url, format!("{}&with_genres=drama", h.base_url));
    assert!(!query.is_degraded());
}

#[tokio::test]
async fn test_search_failure_is_omitted() {
    let mut h = TestHarness::new().await;
    h.script(Ok("drama"), Ok("Tom Hanks")).await;
    let _search = h
        .server
        .mock("GET", "/search/person")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let query = h.builder.build("a drama with Tom Hanks").await;

    assert_eq!(query.url, format!("{}&with_genres=drama", h.base_url));
    assert_eq!(query.actor_id, None);
}

#[tokio::test]
async fn test_token_total_is_sum_of_successful_calls() {
    let mut h = TestHarness::new().await;
    h.script(Ok("comedy"), Ok("Tom Hanks")).await;
    let _search = h.person_search("Tom Hanks", &[(31, "Tom Hanks")]).await;

    let utterance = "I want a funny movie with Tom Hanks";
    let query = h.builder.build(utterance).await;

    let expected = estimate_tokens(fixtures::GENRE_PROMPT)
        + estimate_tokens(utterance)
        + estimate_tokens("comedy")
        + estimate_tokens(fixtures::ACTOR_PROMPT)
        + estimate_tokens(utterance)
        + estimate_tokens("Tom Hanks");
    assert_eq!(query.total_tokens, expected);
}

#[tokio::test]
async fn test_reserved_characters_stay_encoded() {
    let h = TestHarness::new().await;
    h.script(Ok("science fiction & fantasy=über"), Ok("none"))
        .await;

    let query = h.builder.build("space wizards").await;

    assert!(query.url.is_ascii());
    let added = query
        .url
        .strip_prefix(&format!("{}&", h.base_url))
        .expect("parameters appended after the base URL");
    let (key, value) = added.split_once('=').expect("one key/value pair");
    assert_eq!(key, WITH_GENRES);
    assert!(!value.contains('&'));
    assert!(!value.contains('='));
    assert_eq!(
        decode_component(value).as_deref(),
        Some("science fiction & fantasy=über")
    );
}
