use crate::{batch::BatchConfig, classifier::TenderClassifier, store::TenderStore};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecategorizeReport {
    /// Tenders without a category when the run started.
    pub found: usize,
    /// Categories written back.
    pub processed: usize,
    /// Categories computed but not persisted.
    pub failed: usize,
}

/// Classifies every uncategorized tender and writes each result back on its own.
///
/// A write failure for one tender is logged and counted; the rest still go through.
/// Re-running picks up whatever is still uncategorized.
pub async fn recategorize_uncategorized(
    store: &dyn TenderStore,
    classifier: &TenderClassifier,
    config: &BatchConfig,
) -> crate::Result<RecategorizeReport> {
    let pending = store.uncategorized().await?;
    if pending.is_empty() {
        crate::info!("No uncategorized tenders found");
        return Ok(RecategorizeReport::default());
    }

    let items: Vec<_> = pending.iter().map(|t| t.batch_item()).collect();
    let categories = classifier.classify_batch(&items, config).await;

    let mut report = RecategorizeReport {
        found: pending.len(),
        ..Default::default()
    };
    for (id, category) in categories {
        match store.set_category(id, category).await {
            Ok(()) => report.processed += 1,
            Err(e) => {
                crate::error!(tender_id = id, %category, error = %e, "Failed to persist category");
                report.failed += 1;
            }
        }
    }

    crate::info!(
        found = report.found,
        processed = report.processed,
        failed = report.failed,
        "Categorization complete"
    );
    Ok(report)
}
