//! QAnswer and RuBQ query builders against mocked services.

mod integration;

use integration::mock_server::{qanswer_body, MockServerFixture};
use qanary_lib_rust::qanswer::QAnswerRequest;
use qanary_lib_rust::{AnswerKind, Error, QueryBuilder, QueryParams};
use std::time::Duration;

const CAPITAL: &str = "What is the capital of Germany?";
const BERLIN: &str = "http://www.wikidata.org/entity/Q64";
const CAPITAL_SPARQL: &str = "SELECT ?o1 WHERE { wd:Q183 wdt:P36 ?o1 . }";

#[tokio::test]
async fn test_qanswer_query_is_parsed_and_cached() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_qanswer(CAPITAL, "en", &qanswer_body(BERLIN, CAPITAL_SPARQL, 0.9), 1)
        .await;
    let client = fixture.create_client(Duration::from_secs(30));
    let qanswer = fixture.qanswer_builder(client.clone());

    let first = qanswer.query(CAPITAL, None, &QueryParams::new()).await.unwrap();
    let second = qanswer.query(CAPITAL, Some("en"), &QueryParams::new()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.values, vec![BERLIN]);
    assert_eq!(first.answer_kind, AnswerKind::Resource);
    assert_eq!(first.sparql.as_deref(), Some(CAPITAL_SPARQL));
    assert_eq!(first.confidence, 0.9);
    assert_eq!(first.lang, "en");
    assert_eq!(first.knowledge_base.as_deref(), Some("wikidata"));
    assert_eq!(client.executed_requests(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_qanswer_unsupported_language_makes_no_call() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_qanswer(CAPITAL, "es", &qanswer_body(BERLIN, CAPITAL_SPARQL, 0.9), 0)
        .await;
    let client = fixture.create_client(Duration::from_secs(30));
    let qanswer = fixture.qanswer_builder(client.clone());

    assert!(!qanswer.is_lang_supported("es"));
    let err = qanswer
        .query(CAPITAL, Some("es"), &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(client.executed_requests(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_qanswer_malformed_payload_is_result_format_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response("POST", "/api/gerbil", r#"{"questions": []}"#, 1)
        .await;
    let qanswer = fixture.qanswer_builder(fixture.create_client(Duration::from_secs(30)));

    let err = qanswer.query(CAPITAL, None, &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, Error::ResultFormat { .. }));
}

#[tokio::test]
async fn test_qanswer_upstream_error_is_request_failed() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_error_response("/api/gerbil", 502, "bad gateway", 1).await;
    let qanswer = fixture.qanswer_builder(fixture.create_client(Duration::from_secs(30)));

    let err = qanswer.query(CAPITAL, None, &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, Error::RequestFailed { status: Some(502), .. }));
}

#[tokio::test]
async fn test_qanswer_direct_request_uses_named_endpoint() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_qanswer(CAPITAL, "de", &qanswer_body(BERLIN, CAPITAL_SPARQL, 0.7), 1)
        .await;
    let qanswer = fixture.qanswer_builder(fixture.create_client(Duration::from_secs(30)));

    let request = QAnswerRequest {
        endpoint: format!("{}/api/gerbil", fixture.base_url),
        question: CAPITAL.into(),
        language: Some("de".into()),
        knowledge_base: None,
        user: None,
    };
    let result = qanswer.request(&request).await.unwrap();
    assert_eq!(result.lang, "de");
    assert_eq!(result.user.as_deref(), Some("open"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rubq_query_returns_generated_sparql() {
    let fixture = MockServerFixture::new().await;
    let body = serde_json::json!({
        "query": CAPITAL_SPARQL,
        "answers": [BERLIN],
        "confidence": 0.6
    })
    .to_string();
    let mock = fixture.mock_rubq(CAPITAL, "ru", &body, 1).await;
    let client = fixture.create_client(Duration::from_secs(30));
    let rubq = fixture.rubq_builder(client.clone());

    let result = rubq.query(CAPITAL, Some("ru"), &QueryParams::new()).await.unwrap();
    assert_eq!(result.sparql.as_deref(), Some(CAPITAL_SPARQL));
    assert_eq!(result.values, vec![BERLIN]);
    assert_eq!(result.confidence, 0.6);
    assert!(result.knowledge_base.is_none());

    rubq.query(CAPITAL, Some("ru"), &QueryParams::new()).await.unwrap();
    assert_eq!(client.executed_requests(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_builders_share_one_cache_without_collisions() {
    let fixture = MockServerFixture::new().await;
    let q = fixture
        .mock_qanswer(CAPITAL, "en", &qanswer_body(BERLIN, CAPITAL_SPARQL, 0.9), 1)
        .await;
    let r = fixture
        .mock_rubq(CAPITAL, "en", r#"{"query": "", "answers": []}"#, 1)
        .await;
    let client = fixture.create_client(Duration::from_secs(30));
    let qanswer = fixture.qanswer_builder(client.clone());
    let rubq = fixture.rubq_builder(client.clone());

    for _ in 0..2 {
        qanswer.query(CAPITAL, None, &QueryParams::new()).await.unwrap();
        let none = rubq.query(CAPITAL, None, &QueryParams::new()).await.unwrap();
        assert!(none.sparql.is_none());
    }
    assert_eq!(client.executed_requests(), 2);
    assert_eq!(client.cache().size().await.unwrap(), 2);
    q.assert_async().await;
    r.assert_async().await;
}
