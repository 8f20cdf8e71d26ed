//! Pipeline components end to end: triplestore in, QA service, annotations out.

mod integration;

use integration::mock_server::{qanswer_body, MockServerFixture, RecordingTripleStore};
use qanary_lib_rust::sparql::{Binding, RdfTerm, TermKind};
use qanary_lib_rust::{
    EntityEnricher, Error, QAnswerComponent, QanaryComponent, QanaryQuestion, RuBQComponent,
};
use std::sync::Arc;
use std::time::Duration;

const GRAPH: &str = "urn:graph:5a1c";
const QUESTION_URI: &str = "http://localhost:8080/question/stored-question__text_1";
const GERMANY: &str = "http://www.wikidata.org/entity/Q183";
const BERLIN: &str = "http://www.wikidata.org/entity/Q64";
const SPARQL: &str = "SELECT ?o1 WHERE { wd:Q183 wdt:P36 ?o1 . }";

fn literal(value: &str) -> RdfTerm {
    RdfTerm {
        kind: TermKind::Literal,
        value: value.into(),
        datatype: None,
        lang: None,
    }
}

fn entity(resource: &str, start: usize, end: usize, score: Option<f64>) -> Binding {
    let mut b = Binding::new();
    b.insert(
        "entityResource".into(),
        RdfTerm {
            kind: TermKind::Uri,
            value: resource.into(),
            datatype: None,
            lang: None,
        },
    );
    b.insert("start".into(), literal(&start.to_string()));
    b.insert("end".into(), literal(&end.to_string()));
    if let Some(s) = score {
        b.insert("annotationScore".into(), literal(&s.to_string()));
    }
    b
}

fn question(text: &str) -> QanaryQuestion {
    QanaryQuestion::new(QUESTION_URI, text, GRAPH)
}

#[tokio::test]
async fn test_qanswer_component_enriches_queries_and_annotates() {
    let fixture = MockServerFixture::new().await;
    let enriched = format!("What is the capital of {GERMANY} ?");
    let mock = fixture
        .mock_qanswer(&enriched, "en", &qanswer_body(BERLIN, SPARQL, 0.9), 1)
        .await;
    let store = Arc::new(RecordingTripleStore::with_bindings(vec![
        entity(GERMANY, 23, 30, Some(0.8)),
        // below threshold, left as text
        entity("http://www.wikidata.org/entity/Q5119", 11, 18, Some(0.2)),
    ]));
    let component = QAnswerComponent::new(
        fixture.qanswer_builder(fixture.create_client(Duration::from_secs(30))),
        store.clone(),
        EntityEnricher::new(0.5),
        "QAnswerQueryBuilderAndExecutor",
    );

    let result = component
        .process(&question("What is the capital of Germany?"))
        .await
        .unwrap();

    assert_eq!(result.question, enriched);
    assert_eq!(result.values, vec![BERLIN]);
    let selects = store.selects.lock().unwrap().clone();
    assert_eq!(selects.len(), 1);
    assert!(selects[0].contains(QUESTION_URI));
    assert!(selects[0].contains(GRAPH));

    let updates = store.updates();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].contains(GRAPH));
    assert!(updates[0].contains(BERLIN));
    assert!(updates[0].contains("urn:qanary:QAnswerQueryBuilderAndExecutor"));
    assert!(updates[0].contains("https://query.wikidata.org/bigdata/namespace/wdq/sparql"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_qanswer_component_without_entities_sends_question_unchanged() {
    let fixture = MockServerFixture::new().await;
    let text = "Who wrote Faust?";
    let mock = fixture
        .mock_qanswer(text, "en", &qanswer_body("http://www.wikidata.org/entity/Q5879", "SELECT 1", 0.4), 1)
        .await;
    let store = Arc::new(RecordingTripleStore::default());
    let component = QAnswerComponent::new(
        fixture.qanswer_builder(fixture.create_client(Duration::from_secs(30))),
        store.clone(),
        EntityEnricher::new(0.5),
        "qanswer",
    );

    let result = component.process(&question(text)).await.unwrap();
    assert_eq!(result.question, text);
    assert_eq!(store.updates().len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_qanswer_component_writes_nothing_when_service_fails() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_error_response("/api/gerbil", 500, "boom", 1).await;
    let store = Arc::new(RecordingTripleStore::default());
    let component = QAnswerComponent::new(
        fixture.qanswer_builder(fixture.create_client(Duration::from_secs(30))),
        store.clone(),
        EntityEnricher::new(0.5),
        "qanswer",
    );

    let err = component.process(&question("Who wrote Faust?")).await.unwrap_err();
    assert!(matches!(err, Error::RequestFailed { status: Some(500), .. }));
    assert!(store.updates().is_empty());
}

#[tokio::test]
async fn test_rubq_component_annotates_generated_query() {
    let fixture = MockServerFixture::new().await;
    let text = "Какая столица Германии?";
    let body = serde_json::json!({"query": SPARQL, "answers": [BERLIN], "confidence": 0.75}).to_string();
    let mock = fixture.mock_rubq(text, "ru", &body, 1).await;
    let store = Arc::new(RecordingTripleStore::default());
    let component = RuBQComponent::new(
        fixture.rubq_builder(fixture.create_client(Duration::from_secs(30))),
        store.clone(),
        "RuBQQueryBuilder",
    )
    .with_lang("ru");

    let result = component.process(&question(text)).await.unwrap();
    assert_eq!(result.sparql.as_deref(), Some(SPARQL));

    let updates = store.updates();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].contains("urn:qanary:RuBQQueryBuilder"));
    assert!(updates[0].contains("wdt:P36"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rubq_component_skips_annotation_without_query() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_rubq("Hello?", "en", r#"{"query": null, "answers": []}"#, 1)
        .await;
    let store = Arc::new(RecordingTripleStore::default());
    let component = RuBQComponent::new(
        fixture.rubq_builder(fixture.create_client(Duration::from_secs(30))),
        store.clone(),
        "RuBQQueryBuilder",
    );

    let result = component.process(&question("Hello?")).await.unwrap();
    assert!(result.sparql.is_none());
    assert!(store.updates().is_empty());
}
