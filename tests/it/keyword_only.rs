use super::keyword_classifier;
use tender_categorizer::prelude::*;

#[tokio::test]
async fn documented_examples() {
    let classifier = keyword_classifier();
    assert_eq!(
        classifier
            .classify("Repair of rural irrigation canal", None, None)
            .await,
        Category::AgricultureRuralDevelopment
    );
    assert_eq!(
        classifier.classify("Purchase of blue widgets", None, None).await,
        Category::Miscellaneous
    );
}

#[tokio::test]
async fn department_and_item_category_are_searched() {
    let classifier = keyword_classifier();
    assert_eq!(
        classifier
            .classify("Annual rate contract", Some("District Hospital"), None)
            .await,
        Category::MedicalHealthcare
    );
    assert_eq!(
        classifier
            .classify("Annual rate contract", None, Some("Power transformer"))
            .await,
        Category::ElectricalElectronics
    );
}

#[tokio::test]
async fn replacement_keyword_table_is_used() {
    let table = KeywordTable::new([(
        Category::SecurityDefence,
        vec!["widget".to_string()],
    )]);
    let classifier = keyword_classifier().with_keywords(table);
    assert_eq!(
        classifier.classify("Purchase of blue widgets", None, None).await,
        Category::SecurityDefence
    );
    assert_eq!(
        classifier
            .classify("Repair of rural irrigation canal", None, None)
            .await,
        Category::Miscellaneous
    );
}

#[tokio::test(start_paused = true)]
async fn batch_covers_every_item() {
    let classifier = keyword_classifier();
    let items: Vec<BatchItem> = (1..=11)
        .map(|id| BatchItem::new(id, format!("Supply of ambulance {id}")))
        .collect();
    let results = classifier.classify_batch(&items, &BatchConfig::new()).await;
    assert_eq!(results.len(), 11);
    assert!(results
        .values()
        .all(|category| *category == Category::MedicalHealthcare));
}
