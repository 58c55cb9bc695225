use serde_json::json;
use tender_categorizer::prelude::*;

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-it",
        "object": "chat.completion",
        "model": "llama-3.1-70b-versatile",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
    .to_string()
}

fn groq_classifier(server: &mockito::ServerGuard) -> TenderClassifier {
    TenderCategorizer::groq()
        .logging_enabled(false)
        .with_api_host(server.url())
        .with_api_key("gsk_integration")
        .init()
        .unwrap()
}

fn items() -> Vec<BatchItem> {
    vec![
        BatchItem::new(1, "Hiring of buses for staff"),
        BatchItem::new(2, "Repair of rural irrigation canal").department("Water Resources"),
        BatchItem::new(3, "Purchase of blue widgets"),
        BatchItem::new(4, "Supply of surgical gloves"),
        BatchItem::new(5, "CCTV installation"),
        BatchItem::new(6, "Road resurfacing").item_category("Civil works"),
        BatchItem::new(7, "Housekeeping services for office"),
    ]
}

#[tokio::test]
async fn batch_uses_remote_answers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer gsk_integration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Transport / Automotive"))
        .expect(7)
        .create_async()
        .await;

    let classifier = groq_classifier(&server);
    assert!(classifier.has_remote());
    let results = classifier.classify_batch(&items(), &BatchConfig::new()).await;

    assert_eq!(results.len(), 7);
    assert!(results
        .values()
        .all(|category| *category == Category::TransportAutomotive));
    mock.assert_async().await;
}

#[tokio::test]
async fn unavailable_service_degrades_to_keywords() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(7)
        .create_async()
        .await;

    let classifier = groq_classifier(&server);
    let results = classifier.classify_batch(&items(), &BatchConfig::new()).await;

    assert_eq!(results.len(), 7);
    assert_eq!(results[&1], Category::TransportAutomotive);
    assert_eq!(results[&2], Category::AgricultureRuralDevelopment);
    assert_eq!(results[&3], Category::Miscellaneous);
    assert_eq!(results[&4], Category::MedicalHealthcare);
    assert_eq!(results[&5], Category::SecurityDefence);
    assert_eq!(results[&6], Category::ConstructionCivil);
    assert_eq!(results[&7], Category::HousekeepingManpower);
    mock.assert_async().await;
}

#[tokio::test]
async fn unrecognized_answer_is_miscellaneous() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("I cannot determine this."))
        .create_async()
        .await;

    let classifier = groq_classifier(&server);
    let classification = classifier
        .classify_detailed(&ClassificationInput::new(
            "Repair of rural irrigation canal",
            None::<String>,
            None::<String>,
        ))
        .await;
    assert_eq!(classification.category, Category::Miscellaneous);
    assert_eq!(
        classification.outcome,
        ClassificationOutcome::AmbiguousRemoteResponse
    );
}
