//! Annotation queries exchanged with the pipeline triplestore.

use super::results::Binding;
use super::template::{checked_iri, escape_literal, SparqlTemplate};
use crate::types::{AnswerKind, NamedEntity, QaResult, QanaryQuestion};
use crate::{Error, ErrorContext, Result};
use std::collections::BTreeMap;

const PREFIXES: &str = "PREFIX qa: <http://www.wdaqua.eu/qa#>
PREFIX oa: <http://www.w3.org/ns/openannotation/core/>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
";

pub const NAMED_ENTITIES: SparqlTemplate = SparqlTemplate::new(
    "named_entities",
    "SELECT ?entityResource ?annotationScore ?start ?end
FROM <{{graph}}>
WHERE {
  ?annotation oa:hasBody ?entityResource ;
              oa:hasTarget ?target .
  ?target oa:hasSource <{{question}}> ;
          oa:hasSelector ?textSelector .
  ?textSelector rdf:type oa:TextPositionSelector ;
                oa:start ?start ;
                oa:end ?end .
  OPTIONAL { ?annotation qa:score ?annotationScore . }
}
ORDER BY ?start
",
);

pub const QANSWER_ANNOTATIONS: SparqlTemplate = SparqlTemplate::new(
    "qanswer_annotations",
    "INSERT {
  GRAPH <{{graph}}> {
    ?annotationSparql a qa:AnnotationOfAnswerSPARQL ;
        oa:hasTarget ?question ;
        oa:hasBody ?sparql ;
        oa:annotatedBy ?service ;
        oa:annotatedAt ?time ;
        qa:score ?score ;
        qa:overKnowledgeGraph ?knowledgeGraph .
    ?sparql a qa:SparqlQuery ;
        rdf:value ?sparqlQueryString .

    ?annotationImprovedQuestion a qa:AnnotationOfImprovedQuestion ;
        oa:hasTarget ?question ;
        oa:hasBody ?improvedQuestion ;
        oa:annotatedBy ?service ;
        oa:annotatedAt ?time ;
        qa:score ?score .
    ?improvedQuestion a qa:ImprovedQuestion ;
        rdf:value ?improvedQuestionText .

    ?annotationAnswer a qa:AnnotationAnswer ;
        oa:hasTarget ?question ;
        oa:hasBody ?answer ;
        oa:annotatedBy ?service ;
        oa:annotatedAt ?time ;
        qa:score ?score .
    ?answer a qa:Answer ;
        rdf:value [ a rdf:Seq {{answer_values}} ] .

    ?annotationAnswerType a qa:AnnotationOfAnswerType ;
        oa:hasTarget ?question ;
        oa:hasBody ?answerType ;
        oa:annotatedBy ?service ;
        oa:annotatedAt ?time ;
        qa:score ?score .
    ?answerType a qa:AnswerType ;
        rdf:value ?answerDataType .

    ?annotationAnswerJson a qa:AnnotationOfAnswerJson ;
        oa:hasTarget ?question ;
        oa:hasBody ?answerJson ;
        oa:annotatedBy ?service ;
        oa:annotatedAt ?time ;
        qa:score ?score .
    ?answerJson rdf:value ?json .
  }
}
WHERE {
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?annotationSparql) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?sparql) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?annotationImprovedQuestion) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?improvedQuestion) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?annotationAnswer) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?answer) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?annotationAnswerType) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?answerType) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?annotationAnswerJson) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?answerJson) .
  BIND (now() AS ?time) .
  BIND (<{{question}}> AS ?question) .
  BIND (<{{service}}> AS ?service) .
  BIND (\"{{score}}\"^^xsd:double AS ?score) .
  BIND (\"{{sparql}}\"^^xsd:string AS ?sparqlQueryString) .
  BIND (\"{{improved_question}}\"^^xsd:string AS ?improvedQuestionText) .
  BIND (<{{datatype}}> AS ?answerDataType) .
  BIND (\"{{json}}\"^^xsd:string AS ?json) .
  {{knowledge_graph_bind}}
}
",
);

pub const SPARQL_QUERY_ANNOTATION: SparqlTemplate = SparqlTemplate::new(
    "sparql_query_annotation",
    "INSERT {
  GRAPH <{{graph}}> {
    ?annotation a qa:AnnotationOfAnswerSPARQL ;
        oa:hasTarget ?question ;
        oa:hasBody ?sparql ;
        oa:annotatedBy ?service ;
        oa:annotatedAt ?time ;
        qa:score ?score .
    ?sparql a qa:SparqlQuery ;
        rdf:value ?sparqlQueryString .
  }
}
WHERE {
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?annotation) .
  BIND (IRI(CONCAT(\"urn:qanary:annotation:\", STRUUID())) AS ?sparql) .
  BIND (now() AS ?time) .
  BIND (<{{question}}> AS ?question) .
  BIND (<{{service}}> AS ?service) .
  BIND (\"{{score}}\"^^xsd:double AS ?score) .
  BIND (\"{{sparql}}\"^^xsd:string AS ?sparqlQueryString) .
}
",
);

fn with_prefixes(body: String) -> String {
    format!("{}{}", PREFIXES, body)
}

/// `urn:qanary:<application name>`
pub fn service_iri(application_name: &str) -> String {
    format!("urn:qanary:{}", application_name)
}

pub fn named_entities_query(question: &QanaryQuestion) -> Result<String> {
    let mut values = BTreeMap::new();
    values.insert("graph", checked_iri(&question.in_graph)?.to_string());
    values.insert("question", checked_iri(&question.uri)?.to_string());
    Ok(with_prefixes(NAMED_ENTITIES.render(&values)?))
}

/// Reads `?entityResource ?start ?end` and the optional `?annotationScore`.
pub fn named_entities_from_bindings(bindings: &[Binding]) -> Result<Vec<NamedEntity>> {
    bindings
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let field = |name: &str| {
                b.get(name).ok_or_else(|| {
                    Error::triplestore_with_context(
                        format!("binding {} has no ?{}", i, name),
                        ErrorContext::new().with_source("named_entities"),
                    )
                })
            };
            let offset = |name: &str| -> Result<usize> {
                let term = field(name)?;
                term.value.trim().parse::<usize>().map_err(|_| {
                    Error::triplestore_with_context(
                        format!("?{} is not an offset: '{}'", name, term.value),
                        ErrorContext::new().with_source("named_entities"),
                    )
                })
            };
            let resource = field("entityResource")?.value.clone();
            let start = offset("start")?;
            let end = offset("end")?;
            let score = match b.get("annotationScore") {
                Some(term) => Some(term.value.trim().parse::<f64>().map_err(|_| {
                    Error::triplestore_with_context(
                        format!("?annotationScore is not a number: '{}'", term.value),
                        ErrorContext::new().with_source("named_entities"),
                    )
                })?),
                None => None,
            };
            Ok(NamedEntity { resource, start, end, score })
        })
        .collect()
}

/// `; rdf:_1 <...> ; rdf:_2 <...>` members of the answer sequence.
fn answer_sequence(result: &QaResult) -> Result<String> {
    let mut out = String::new();
    for (i, value) in result.values.iter().enumerate() {
        let n = i + 1;
        match result.answer_kind {
            AnswerKind::Resource => {
                out.push_str(&format!("; rdf:_{} <{}> ", n, checked_iri(value)?));
            }
            AnswerKind::Literal | AnswerKind::Boolean => {
                out.push_str(&format!(
                    "; rdf:_{} \"{}\"^^<{}> ",
                    n,
                    escape_literal(value),
                    checked_iri(&result.datatype)?
                ));
            }
        }
    }
    Ok(out)
}

/// Annotations for a QAnswer result: query, improved question, answers, answer
/// type and raw JSON. `knowledge_graph` is the endpoint of the queried KB if known.
pub fn qanswer_annotations(
    question: &QanaryQuestion,
    result: &QaResult,
    application_name: &str,
    knowledge_graph: Option<&str>,
) -> Result<String> {
    let service = service_iri(application_name);
    let mut values = BTreeMap::new();
    values.insert("graph", checked_iri(&question.out_graph)?.to_string());
    values.insert("question", checked_iri(&question.uri)?.to_string());
    values.insert("service", checked_iri(&service)?.to_string());
    values.insert("score", result.confidence.to_string());
    values.insert("sparql", escape_literal(result.sparql.as_deref().unwrap_or_default()));
    values.insert("improved_question", escape_literal(&result.question));
    values.insert("answer_values", answer_sequence(result)?);
    values.insert("datatype", checked_iri(&result.datatype)?.to_string());
    values.insert("json", escape_literal(&result.raw_json()));
    let kg = match knowledge_graph {
        Some(endpoint) => format!("BIND (<{}> AS ?knowledgeGraph) .", checked_iri(endpoint)?),
        None => String::new(),
    };
    values.insert("knowledge_graph_bind", kg);
    Ok(with_prefixes(QANSWER_ANNOTATIONS.render(&values)?))
}

/// Annotation of a generated SPARQL query only.
pub fn sparql_query_annotation(
    question: &QanaryQuestion,
    sparql: &str,
    confidence: f64,
    application_name: &str,
) -> Result<String> {
    let service = service_iri(application_name);
    let mut values = BTreeMap::new();
    values.insert("graph", checked_iri(&question.out_graph)?.to_string());
    values.insert("question", checked_iri(&question.uri)?.to_string());
    values.insert("service", checked_iri(&service)?.to_string());
    values.insert("score", confidence.to_string());
    values.insert("sparql", escape_literal(sparql));
    Ok(with_prefixes(SPARQL_QUERY_ANNOTATION.render(&values)?))
}
