//! HTTP joke source integration tests
//!
//! Runs `HttpJokeSource` against a local wiremock server:
//! - request shape (Accept header, User-Agent)
//! - error mapping for non-2xx and malformed bodies
//! - full refresh through the board onto disk

use dad_jokes::config::ApiConfig;
use dad_jokes::{
    CancellationFlag, FetchError, FileStorage, HttpJokeSource, JokeBoard, JokeFetcher,
    JokeSource, JokeStore,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        endpoint: format!("{}/", server.uri()),
        timeout_secs: 5,
        user_agent: "dad-jokes-tests".to_string(),
    }
}

fn joke_body(id: &str, joke: &str) -> serde_json::Value {
    json!({ "id": id, "joke": joke, "status": 200 })
}

async fn mount_once(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_requests_json_and_extracts_joke() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "dad-jokes-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(joke_body(
            "0189hNRf2g",
            "I'm tired of following my dreams. I'm just going to ask them where they are going and meet up with them later.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpJokeSource::new(&api_config(&server)).unwrap();
    let text = source.next_joke().await.unwrap();

    assert!(text.starts_with("I'm tired of following my dreams."));
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&server)
        .await;

    let source = HttpJokeSource::new(&api_config(&server)).unwrap();
    match source.next_joke().await {
        Err(FetchError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "down for maintenance");
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_html_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>joke</html>"))
        .mount(&server)
        .await;

    let source = HttpJokeSource::new(&api_config(&server)).unwrap();
    assert!(matches!(source.next_joke().await, Err(FetchError::Malformed(_))));
}

#[tokio::test]
async fn test_missing_joke_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 200 })))
        .mount(&server)
        .await;

    let source = HttpJokeSource::new(&api_config(&server)).unwrap();
    assert!(matches!(source.next_joke().await, Err(FetchError::Malformed(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let config = ApiConfig {
        endpoint: "http://127.0.0.1:9/".to_string(),
        timeout_secs: 2,
        user_agent: "dad-jokes-tests".to_string(),
    };
    let source = HttpJokeSource::new(&config).unwrap();
    assert!(matches!(source.next_joke().await, Err(FetchError::Network(_))));
}

#[tokio::test]
async fn test_refresh_skips_duplicates_and_persists() {
    let server = MockServer::start().await;
    mount_once(&server, joke_body("a", "A")).await;
    mount_once(&server, joke_body("a", "A")).await;
    mount_once(&server, joke_body("b", "B")).await;

    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    let fetcher = JokeFetcher::new(HttpJokeSource::new(&api_config(&server)).unwrap());
    let mut board = JokeBoard::new(JokeStore::open(storage.clone(), "jokes"), fetcher, 2);

    let jokes = board.refresh(&CancellationFlag::new()).await.unwrap();
    let texts: Vec<&str> = jokes.iter().map(|j| j.text.as_str()).collect();
    assert_eq!(texts, vec!["A", "B"]);

    let reopened = JokeStore::open(storage, "jokes");
    assert_eq!(reopened.jokes(), board.store().jokes());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_refresh_keeps_saved_board() {
    let server = MockServer::start().await;
    mount_once(&server, joke_body("a", "A")).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    let fetcher = JokeFetcher::new(HttpJokeSource::new(&api_config(&server)).unwrap());
    let mut board = JokeBoard::new(JokeStore::open(storage.clone(), "jokes"), fetcher, 1);

    board.refresh(&CancellationFlag::new()).await.unwrap();
    let result = board.refresh(&CancellationFlag::new()).await;

    assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
    let reopened = JokeStore::open(storage, "jokes");
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.jokes()[0].text, "A");
}
