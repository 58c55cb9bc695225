use crate::{
    classifier::TenderClassifier,
    store::{NewTender, TenderRecord, TenderStore},
};

fn blank_to_none(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Validates, classifies and stores a manually entered tender.
///
/// Portal, bid number and title are required. Classification cannot fail, so a
/// remote outage only degrades the category, it never blocks the insert.
pub async fn ingest_manual_tender(
    store: &dyn TenderStore,
    classifier: &TenderClassifier,
    tender: NewTender,
) -> crate::Result<TenderRecord> {
    if tender.portal_name.trim().is_empty()
        || tender.bid_number.trim().is_empty()
        || tender.title.trim().is_empty()
    {
        crate::bail!("Portal, bid number, and title are required");
    }

    let tender = NewTender {
        department: blank_to_none(tender.department),
        item_category: blank_to_none(tender.item_category),
        state_location: blank_to_none(tender.state_location),
        estimated_value: blank_to_none(tender.estimated_value),
        source_url: blank_to_none(tender.source_url),
        ..tender
    };

    let category = classifier
        .classify(
            &tender.title,
            tender.department.as_deref(),
            tender.item_category.as_deref(),
        )
        .await;

    let record = store.insert_tender(tender, Some(category)).await?;
    crate::info!(tender_id = record.id, %category, "Added manual tender");
    Ok(record)
}
