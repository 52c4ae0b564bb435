use std::sync::Arc;
use std::time::Duration;

use finder_engine::{
    EngineEvent, EngineHandle, FailureKind, JobPosting, JobSearchClient, ReqwestSearchClient,
    SearchError, SearchSettings, StaticCredentials,
};
use serde_json::json;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

/// Answers immediately: a single hit titled after the query, or a failure
/// for the query "fail".
struct EchoClient;

#[async_trait::async_trait]
impl JobSearchClient for EchoClient {
    async fn search(&self, query: &str) -> Result<Vec<JobPosting>, SearchError> {
        if query == "fail" {
            return Err(upstream_failure());
        }
        Ok(vec![JobPosting {
            title: query.to_string(),
            ..JobPosting::default()
        }])
    }
}

fn upstream_failure() -> SearchError {
    finder_engine::parse_hits(b"{}").unwrap_err()
}

fn completed(event: Option<EngineEvent>) -> (u64, Result<Vec<JobPosting>, SearchError>) {
    match event {
        Some(EngineEvent::SearchCompleted { request_id, result }) => (request_id, result),
        None => panic!("engine produced no event"),
    }
}

#[test]
fn each_request_settles_once_with_its_id() {
    let engine = EngineHandle::new(Arc::new(EchoClient)).unwrap();
    engine.search(1, "ReactJs");

    let (request_id, result) = completed(engine.recv_timeout(WAIT));
    assert_eq!(request_id, 1);
    assert_eq!(result.unwrap()[0].title, "ReactJs");
    assert!(engine.recv_timeout(Duration::from_millis(100)).is_none());
}

#[test]
fn failures_are_delivered_as_events() {
    let engine = EngineHandle::new(Arc::new(EchoClient)).unwrap();
    engine.search(9, "fail");

    let (request_id, result) = completed(engine.recv_timeout(WAIT));
    assert_eq!(request_id, 9);
    assert_eq!(result.unwrap_err().kind, FailureKind::MissingHits);
}

/// Panics for the query "boom", answers normally otherwise.
struct PanickyClient;

#[async_trait::async_trait]
impl JobSearchClient for PanickyClient {
    async fn search(&self, query: &str) -> Result<Vec<JobPosting>, SearchError> {
        if query == "boom" {
            panic!("client blew up");
        }
        EchoClient.search(query).await
    }
}

#[test]
fn panicking_client_still_settles_the_request() {
    let engine = EngineHandle::new(Arc::new(PanickyClient)).unwrap();
    engine.search(4, "boom");

    let (request_id, result) = completed(engine.recv_timeout(WAIT));
    assert_eq!(request_id, 4);
    let err = result.unwrap_err();
    assert_eq!(err.kind, FailureKind::Internal);
    assert!(err.message.contains("client blew up"));

    // The engine keeps serving after a panicked task.
    engine.search(5, "ReactJs");
    let (request_id, result) = completed(engine.recv_timeout(WAIT));
    assert_eq!(request_id, 5);
    assert_eq!(result.unwrap()[0].title, "ReactJs");
}

#[tokio::test(flavor = "multi_thread")]
async fn overlapping_requests_settle_in_completion_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "q": "ReactJs" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_json(json!({ "hits": [{ "title": "React Dev" }] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "q": "Backend" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "hits": [{ "title": "Backend Dev" }] })),
        )
        .mount(&server)
        .await;

    let settings = SearchSettings {
        endpoint: format!("{}/v1/job/search", server.uri()),
        ..SearchSettings::default()
    };
    let credentials = Arc::new(StaticCredentials::new(Some("k".to_string()), "host.test"));
    let client = ReqwestSearchClient::new(settings, credentials).unwrap();
    let engine = EngineHandle::new(Arc::new(client)).unwrap();

    engine.search(1, "ReactJs");
    engine.search(2, "Backend");

    let order = tokio::task::spawn_blocking(move || {
        let first = completed(engine.recv_timeout(WAIT));
        let second = completed(engine.recv_timeout(WAIT));
        vec![first, second]
    })
    .await
    .unwrap();

    let summary: Vec<_> = order
        .into_iter()
        .map(|(id, result)| (id, result.unwrap()[0].title.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (2, "Backend Dev".to_string()),
            (1, "React Dev".to_string())
        ]
    );
}
