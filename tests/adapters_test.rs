//! HTTP contract tests for the network adapters against a local mock server

use jarvis::ai::{ChatModel, OpenRouterClient};
use jarvis::lookup::{GithubSearch, KnowledgeBase, RepoSearch, WikipediaClient};
use jarvis::{Config, JarvisError};
use serde_json::json;
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        openrouter_url: format!("{}/api/v1/chat/completions", server.uri()),
        openrouter_api_key: "test-key".to_string(),
        github_api_url: server.uri(),
        wikipedia_url: format!("{}/", server.uri()),
        user_name: "Tony".to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_openrouter_sends_prompt_and_reads_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": Config::default().ai_model })))
        .and(body_string_contains("Your boss is Tony."))
        .and(body_string_contains("what is rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A language."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    assert_eq!(client.complete("what is rust").await.unwrap(), "A language.");
}

#[tokio::test]
async fn test_openrouter_error_status_is_a_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    match client.complete("hi").await {
        Err(JarvisError::Service { service, .. }) => assert_eq!(service, "OpenRouter"),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_openrouter_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new(&config_for(&server)).unwrap();
    assert!(client.complete("hi").await.is_err());
}

#[tokio::test]
async fn test_github_search_truncates_to_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "tokio"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 812,
            "items": [
                {"full_name": "tokio-rs/tokio", "html_url": "https://github.com/tokio-rs/tokio",
                 "description": "A runtime", "stargazers_count": 25000},
                {"full_name": "tokio-rs/axum", "html_url": "https://github.com/tokio-rs/axum",
                 "description": null, "stargazers_count": 18000},
                {"full_name": "tokio-rs/mini-redis", "html_url": "https://github.com/tokio-rs/mini-redis",
                 "stargazers_count": 4000}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let search = GithubSearch::new(&config_for(&server)).unwrap();
    let results = search.search("tokio", 2).await.unwrap();
    assert_eq!(results.total_count, 812);
    assert_eq!(results.items.len(), 2);
    assert_eq!(results.items[0].full_name, "tokio-rs/tokio");
    assert!(results.items[1].description.is_none());
}

#[tokio::test]
async fn test_github_rate_limit_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let search = GithubSearch::new(&config_for(&server)).unwrap();
    assert!(search.search("tokio", 5).await.is_err());
}

#[tokio::test]
async fn test_wikipedia_search_and_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("srsearch", "ferris"))
        .and(query_param("srlimit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"search": [{"title": "Ferris"}, {"title": "Missing page"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Ferris"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"extract": "Ferris is a crab."})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Missing_page"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let wiki = WikipediaClient::new(&config_for(&server)).unwrap();
    assert_eq!(
        wiki.search("ferris", 3).await.unwrap(),
        vec!["Ferris", "Missing page"]
    );
    assert_eq!(wiki.summary("Ferris").await.unwrap(), "Ferris is a crab.");

    let err = wiki.summary("Missing page").await.unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn test_wikipedia_search_without_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"batchcomplete": ""})))
        .mount(&server)
        .await;

    let wiki = WikipediaClient::new(&config_for(&server)).unwrap();
    assert!(wiki.search("qwzx", 5).await.unwrap().is_empty());
}
