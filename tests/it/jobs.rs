use super::keyword_classifier;
use chrono::{Duration, Utc};
use tender_categorizer::prelude::*;

fn tender(bid_number: &str, title: &str) -> NewTender {
    NewTender {
        portal_name: "GeM".to_string(),
        bid_number: bid_number.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn recategorize_then_alert() {
    let store = InMemoryTenderStore::new();
    let classifier = keyword_classifier();

    for (bid, title) in [
        ("GEM/1", "Construction of boundary wall"),
        ("GEM/2", "Supply of hospital beds"),
        ("GEM/3", "Purchase of blue widgets"),
        ("GEM/4", "Bridge maintenance"),
        ("GEM/5", "Road patching"),
        ("GEM/6", "Cement procurement"),
    ] {
        store.insert_tender(tender(bid, title), None).await.unwrap();
    }
    store
        .add_subscriber(Subscriber {
            client_id: 10,
            company_name: "Acme Infra".to_string(),
            email: Some("bids@acme.example".to_string()),
            category_interested: validate_interest("Construction / Civil").unwrap(),
        })
        .await;

    let report = recategorize_uncategorized(&store, &classifier, &BatchConfig::new())
        .await
        .unwrap();
    assert_eq!(report.found, 6);
    assert_eq!(report.processed, 6);
    assert!(store.uncategorized().await.unwrap().is_empty());

    // Second run finds nothing left to do.
    let again = recategorize_uncategorized(&store, &classifier, &BatchConfig::new())
        .await
        .unwrap();
    assert_eq!(again, RecategorizeReport::default());

    let alerts = send_daily_alerts(&store, Utc::now() - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(alerts.clients_notified, 1);
    assert_eq!(alerts.alerts_logged, 4);
    assert_eq!(alerts.total_clients, 1);
}

#[tokio::test]
async fn manual_entry_is_classified_on_insert() {
    let store = InMemoryTenderStore::new();
    let record = ingest_manual_tender(
        &store,
        &keyword_classifier(),
        NewTender {
            department: Some("Indian Army".to_string()),
            ..tender("GEM/2024/B/991", "Perimeter fencing")
        },
    )
    .await
    .unwrap();
    assert_eq!(record.category, Some(Category::SecurityDefence));
    assert!(store.uncategorized().await.unwrap().is_empty());
}
