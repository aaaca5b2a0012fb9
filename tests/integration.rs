// Integration tests for sdocheck components
// These tests run complete verifications against the bundled vocabulary

use sdocheck_core::{
    AnnotationPath, ErrorEntry, Severity, VerificationReport, VerificationResult, DESCRIPTION_EXECUTION_ABORT,
};
use sdocheck_engine::{InputValue, Verifier, VerifierConfig};
use sdocheck_vocab::bundled::reduced_vocabulary;
use serde_json::{json, Value};
use std::sync::Arc;

fn verifier() -> Verifier {
    Verifier::new(Arc::new(reduced_vocabulary().unwrap()))
}

async fn verify(input: impl Into<InputValue>) -> VerificationReport {
    verifier().validate(input).await
}

fn codes(report: &VerificationReport) -> Vec<u16> {
    report.errors().iter().map(ErrorEntry::error_code).collect()
}

/// Single error expected; returns it
fn single(report: &VerificationReport) -> &ErrorEntry {
    assert_eq!(report.errors().len(), 1, "{:#?}", report.errors());
    &report.errors()[0]
}

fn person(extra: Value) -> Value {
    let mut annotation = json!({"@context": "https://schema.org/", "@type": "Person", "name": "Anna"});
    if let (Some(target), Value::Object(members)) = (annotation.as_object_mut(), extra) {
        target.extend(members);
    }
    annotation
}

#[tokio::test]
async fn test_empty_inputs() {
    for input in [InputValue::Null, InputValue::Undefined, json!({}).into(), json!([]).into()] {
        let report = verify(input).await;
        let error = single(&report);
        assert_eq!(error.error_code(), 102);
        assert_eq!(error.severity(), Severity::Critical);
        assert_eq!(report.verification_result(), VerificationResult::Invalid);
    }
}

#[tokio::test]
async fn test_unparseable_strings() {
    for text in ["", "{", "{\"@context\": \"https://schema.org/\",}", "<html></html>", "{'@type': 'Person'}"] {
        let report = verify(text).await;
        assert_eq!(single(&report).error_code(), 101, "{}", text);
        assert_eq!(single(&report).severity(), Severity::Critical);
        assert_eq!(report.verification_result(), VerificationResult::Invalid);
    }
}

#[tokio::test]
async fn test_no_json_object() {
    for input in [json!([{"@type": "Person"}]), json!(5), json!(false)] {
        assert_eq!(codes(&verify(input).await), vec![103]);
    }
    // raw text holding a JSON string
    assert_eq!(codes(&verify("\"Person\"").await), vec![103]);
}

#[tokio::test]
async fn test_use_of_undefined() {
    let annotation = InputValue::Object(vec![
        ("@context".into(), "https://schema.org/".into()),
        ("@type".into(), "Person".into()),
        ("name".into(), "Anna".into()),
        ("description".into(), InputValue::Undefined),
    ]);
    let report = verify(annotation).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 104);
    assert_eq!(error.severity(), Severity::Error);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_missing_context() {
    let report = verify(json!({"@type": "Person", "name": "Anna", "nam": 1})).await;
    assert_eq!(single(&report).error_code(), 201);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_bad_context() {
    let report = verify(json!({"@context": {"@vocab": 5}, "@type": "Person", "name": "Anna"})).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 202);
    assert_eq!(error.name(), "Bad @Context");
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_non_conform_context() {
    let report = verify(json!({"@context": "http://example.org/", "@type": "Person", "name": "Anna"})).await;
    assert_eq!(single(&report).error_code(), 301);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_missing_root_type() {
    let report = verify(json!({"@context": "https://schema.org/", "name": "Anna"})).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 203);
    assert_eq!(error.annotation_path(), Some("$"));
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_missing_entity_type() {
    let report = verify(person(json!({"knows": {"name": "Ben"}}))).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 203);
    assert_eq!(error.annotation_path(), Some("$.schema:knows/0"));
}

#[tokio::test]
async fn test_double_nested_array() {
    let report = verify(person(json!({"description": [["a"], "b"]}))).await;
    assert_eq!(codes(&report), vec![205]);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_null_value_warning() {
    let report = verify(json!({
        "@context": "http://schema.org/",
        "@type": "Person",
        "name": "A",
        "description": null
    }))
    .await;
    let error = single(&report);
    assert_eq!(error.error_code(), 206);
    assert_eq!(error.severity(), Severity::Warning);
    assert_eq!(report.verification_result(), VerificationResult::ValidWithWarnings);
}

#[tokio::test]
async fn test_null_type() {
    let report = verify(json!({"@context": "https://schema.org/", "@type": null, "name": "A"})).await;
    assert_eq!(codes(&report), vec![206, 204]);
    assert_eq!(report.errors()[0].severity(), Severity::Critical);
    assert_eq!(report.errors()[1].annotation_path(), None);
    assert_eq!(report.errors()[1].value(), Some(&json!(null)));
    assert_eq!(report.description(), DESCRIPTION_EXECUTION_ABORT);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_invalid_type_value_aborts() {
    let report = verify(json!({"@context": "https://schema.org/", "@type": 1337, "name": "A"})).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 204);
    assert_eq!(error.annotation_path(), None);
    assert_eq!(error.value(), Some(&json!(1337)));
    assert_eq!(report.description(), DESCRIPTION_EXECUTION_ABORT);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_remote_context_aborts() {
    let report = verify(json!({"@context": ["http://example.org/ctx.jsonld"], "@type": "Person", "name": "A"})).await;
    let last = report.errors().last().unwrap();
    assert_eq!(last.error_code(), 999);
    assert_eq!(last.severity(), Severity::Critical);
    assert_eq!(last.annotation_path(), Some("$"));
    assert!(last.description().contains("http://example.org/ctx.jsonld"));
    assert_eq!(report.description(), DESCRIPTION_EXECUTION_ABORT);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_nesting_depth_aborts() {
    let config = VerifierConfig {
        max_depth: 2,
        ..VerifierConfig::default()
    };
    let verifier = Verifier::with_config(Arc::new(reduced_vocabulary().unwrap()), config).unwrap();
    let report = verifier
        .validate(person(json!({"knows": {"@type": "Person", "knows": {"@type": "Person", "name": "Cid"}}})))
        .await;
    let error = single(&report);
    assert_eq!(error.error_code(), 999);
    assert_eq!(error.severity(), Severity::Critical);
    assert_eq!(error.annotation_path(), Some("$"));
    assert!(error.description().contains("maximum nesting depth of 2"));
    assert_eq!(report.description(), DESCRIPTION_EXECUTION_ABORT);
}

#[tokio::test]
async fn test_all_undefined_members_is_empty() {
    let annotation = InputValue::Object(vec![("@context".into(), InputValue::Undefined)]);
    assert_eq!(codes(&verify(annotation).await), vec![102]);
}

#[tokio::test]
async fn test_full_iri_property_is_not_a_term() {
    let report = verify(json!({"@context": "https://schema.org/", "@type": "Person", "https://schema.org/name": "A"})).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 303);
    assert_eq!(error.annotation_path(), Some("$"));
}

#[tokio::test]
async fn test_empty_string() {
    let report = verify(person(json!({"description": ""}))).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 207);
    assert_eq!(error.annotation_path(), Some("$.schema:description/0"));
    assert_eq!(report.verification_result(), VerificationResult::ValidWithWarnings);
}

#[tokio::test]
async fn test_code_300_variants() {
    let report = verify(json!({"@context": "schema.org", "@type": "Person", "name": "A"})).await;
    assert_eq!(single(&report).name(), "Non-ideal @context");

    let report = verify(person(json!({"description": "Runner "}))).await;
    let error = single(&report);
    assert_eq!((error.error_code(), error.name()), (300, "Trailing spaces"));
    assert_eq!(error.value(), Some(&json!("Runner ")));

    let report = verify(person(json!({"knows": {"@id": "http://example.org/ben"}}))).await;
    let error = single(&report);
    assert_eq!((error.error_code(), error.name()), (300, "Unknown range"));
    assert_eq!(error.value(), Some(&json!("http://example.org/ben")));
    assert_eq!(report.verification_result(), VerificationResult::ValidWithWarnings);
}

#[tokio::test]
async fn test_type_blank_space() {
    let report = verify(json!({
        "@context": "http://schema.org/",
        "@type": "Perso n",
        "name": "A",
        "description": "..."
    }))
    .await;
    let error = single(&report);
    assert_eq!(error.error_code(), 302);
    assert_eq!(error.name(), "Non-conform @type (blank space)");
    assert_eq!(error.annotation_path(), Some("$.@type/0"));
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_type_case() {
    let report = verify(json!({"@context": "https://schema.org/", "@type": ["Person", "sportsTeam"], "name": "A"})).await;
    let error = single(&report);
    assert_eq!(error.name(), "Non-conform @type (uppercase/lowercase)");
    assert!(error.description().contains("that should be 'SportsTeam'"));
    assert_eq!(error.annotation_path(), Some("$.@type/1"));
}

#[tokio::test]
async fn test_property_misspell() {
    let report = verify(json!({
        "@context": "http://schema.org/",
        "@type": "Person",
        "nam": "A",
        "description": "..."
    }))
    .await;
    let error = single(&report);
    assert_eq!(error.error_code(), 303);
    assert_eq!(error.name(), "Non-conform property (misspell)");
    assert!(error.description().contains("'name"));
    assert_eq!(report.verification_result(), VerificationResult::Invalid);
}

#[tokio::test]
async fn test_property_blank_space() {
    let report = verify(person(json!({"job Title": "Coach"}))).await;
    let error = single(&report);
    assert_eq!(error.name(), "Non-conform property (blank space)");
    assert_eq!(error.value(), Some(&json!("schema:job Title")));
}

#[tokio::test]
async fn test_action_properties() {
    let valid = json!({
        "@context": "https://schema.org/",
        "@type": "SearchAction",
        "query-input": "required name=search",
        "target": {"@type": "EntryPoint", "urlTemplate": "https://example.org/search?q={search}"}
    });
    assert!(codes(&verify(valid).await).is_empty());

    let invalid = json!({"@context": "https://schema.org/", "@type": "SearchAction", "query-input": "optional"});
    let report = verify(invalid).await;
    assert_eq!(single(&report).error_code(), 304);
}

#[tokio::test]
async fn test_domain() {
    let report = verify(person(json!({"nsn": "1234"}))).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 305);
    assert!(error.description().contains("('Person')"));

    // inherited properties are fine
    let report = verify(json!({"@context": "https://schema.org/", "@type": "SportsTeam", "name": "A", "founder": {"@type": "Person", "name": "B"}})).await;
    assert!(report.errors().is_empty());
}

#[tokio::test]
async fn test_literal_range() {
    let report = verify(json!({"@context": "http://schema.org/", "@type": "Person", "description": true})).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 306);
    assert_eq!(report.verification_result(), VerificationResult::Invalid);

    let report = verify(person(json!({"birthDate": "02.12.1983"}))).await;
    assert_eq!(codes(&report), vec![306]);

    let report = verify(person(json!({"url": "www.example.org", "birthDate": "1983-12"}))).await;
    assert!(report.errors().is_empty());
}

#[tokio::test]
async fn test_entity_range() {
    let report = verify(person(json!({"worksFor": {"@type": "Person", "name": "B"}}))).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 306);
    assert_eq!(error.value(), Some(&json!("schema:Person")));

    // subclasses of the range are accepted
    let report = verify(person(json!({"worksFor": {"@type": "SportsTeam", "name": "Club"}}))).await;
    assert!(report.errors().is_empty());
}

#[tokio::test]
async fn test_string_range() {
    let report = verify(person(json!({"worksFor": "Acme"}))).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 307);
    assert_eq!(error.severity(), Severity::Warning);
    assert_eq!(report.verification_result(), VerificationResult::ValidWithWarnings);
}

#[tokio::test]
async fn test_enumeration_members() {
    let offer = |availability: &str| {
        json!({
            "@context": "https://schema.org/",
            "@type": "Offer",
            "price": 10,
            "availability": availability
        })
    };
    assert!(verify(offer("InStock")).await.errors().is_empty());
    assert!(verify(offer("https://schema.org/OutOfStock")).await.errors().is_empty());
    assert_eq!(codes(&verify(offer("Sold out")).await), vec![307]);
}

#[tokio::test]
async fn test_empty_entity() {
    let report = verify(json!({"@context": "http://schema.org/", "@type": "Person"})).await;
    let error = single(&report);
    assert_eq!(error.error_code(), 309);
    assert_eq!(error.severity(), Severity::Warning);
    assert_eq!(report.verification_result(), VerificationResult::ValidWithWarnings);
}

#[tokio::test]
async fn test_graph_root() {
    let report = verify(json!({
        "@context": "https://schema.org/",
        "@graph": [{"@type": "Person", "name": "Anna", "nam": "x"}]
    }))
    .await;
    let error = single(&report);
    assert_eq!(error.error_code(), 303);
    assert_eq!(error.annotation_path(), Some("$"));
}

#[tokio::test]
async fn test_paths_resolve_in_normalized_tree() {
    let report = verify(person(json!({"knows": [{"@type": "Person", "name": "B"}, {"@type": "Person", "nsn": "1"}]}))).await;
    let error = single(&report);
    let path: AnnotationPath = error.annotation_path().unwrap().parse().unwrap();
    assert_eq!(path.to_string(), "$.schema:knows/1");

    let normalized = json!({
        "@type": "schema:Person",
        "schema:knows": [{"@type": "schema:Person"}, {"@type": "schema:Person", "schema:nsn": "1"}]
    });
    assert_eq!(path.resolve(&normalized).unwrap()["schema:nsn"], json!("1"));
}

#[tokio::test]
async fn test_errors_keep_key_order() {
    let report = verify(json!({
        "@context": "https://schema.org/",
        "@type": "Person",
        "nsn": "1",
        "name": "Anna ",
        "description": true
    }))
    .await;
    // normalized keys are ordered, so description comes before name and nsn
    assert_eq!(codes(&report), vec![306, 300, 305]);
}

#[tokio::test]
async fn test_determinism() {
    let annotation = json!({
        "@context": "www.schema.org",
        "@type": ["Persn", "Organisation"],
        "nmae": "A",
        "knows": [{"@type": "Person"}, {"name": "x"}],
        "description": null
    });
    let verifier = verifier();
    let first = verifier.validate(annotation.clone()).await;
    let second = verifier.validate(annotation).await;
    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
}

#[tokio::test]
async fn test_context_forms_are_equivalent() {
    let canonical = json!({
        "@context": {"schema": "http://schema.org/"},
        "@type": "schema:Person",
        "schema:name": "Anna",
        "schema:nsn": "1"
    });
    let vocab = json!({"@context": {"@vocab": "https://schema.org/"}, "@type": "Person", "name": "Anna", "nsn": "1"});
    let alternate = json!({"@context": "www.schema.org", "@type": "Person", "name": "Anna", "nsn": "1"});

    let verifier = verifier();
    let canonical = verifier.validate(canonical).await;
    let vocab = verifier.validate(vocab).await;
    let alternate = verifier.validate(alternate).await;

    assert_eq!(codes(&canonical), vec![305]);
    assert_eq!(canonical.errors(), vocab.errors());

    let without_context_warning: Vec<ErrorEntry> = alternate
        .errors()
        .iter()
        .filter(|e| e.name() != "Non-ideal @context")
        .cloned()
        .collect();
    assert_eq!(canonical.errors(), without_context_warning.as_slice());
}

#[tokio::test]
async fn test_batch_of_page_candidates() {
    let candidates = vec![
        r#"{"@context": "https://schema.org/", "@type": "Person", "name": "Anna"}"#.to_string(),
        r#"{"@context": "https://schema.org/", "@type": "#.to_string(),
        r#"{"@context": "https://schema.org/", "@type": "Event", "name": "Run", "startDate": "2024-05-01T10:00"}"#
            .to_string(),
    ];
    let reports = verifier().validate_all(candidates).await;
    assert_eq!(reports.len(), 3);
    assert!(reports[0].errors().is_empty());
    assert_eq!(codes(&reports[1]), vec![101]);
    assert!(reports[2].errors().is_empty());
}

#[tokio::test]
async fn test_shared_verifier_across_tasks() {
    let verifier = Arc::new(verifier());
    let tasks = (0..16).map(|i| {
        let verifier = verifier.clone();
        tokio::spawn(async move {
            let annotation = if i % 2 == 0 { person(json!({})) } else { person(json!({"nsn": "1"})) };
            (i, verifier.validate(annotation).await)
        })
    });
    for result in futures::future::join_all(tasks).await {
        let (i, report) = result.unwrap();
        assert_eq!(report.errors().is_empty(), i % 2 == 0);
    }
}

#[tokio::test]
async fn test_custom_config_limits_suggestions() {
    let config = VerifierConfig {
        max_suggestions: 1,
        ..VerifierConfig::default()
    };
    let verifier = Verifier::with_config(Arc::new(reduced_vocabulary().unwrap()), config).unwrap();
    let report = verifier.validate(person(json!({"nme": "x"}))).await;
    let error = single(&report);
    assert!(!error.description().contains(", "), "{}", error.description());
}
