//! Chunked batch classification.
//!
//! Items are split into fixed-size chunks. Each chunk runs fully concurrently and is
//! joined before the next one starts, with a fixed pause between chunks (none before
//! the first or after the last). Chunk size and pause are the only admission control
//! in front of the rate-limited remote service.

use crate::{
    categories::Category,
    classifier::{ClassificationInput, TenderClassifier},
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

pub type TenderId = i64;

pub const DEFAULT_CHUNK_SIZE: usize = 5;
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub id: TenderId,
    pub title: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub item_category: Option<String>,
}

impl BatchItem {
    pub fn new<T: Into<String>>(id: TenderId, title: T) -> Self {
        Self {
            id,
            title: title.into(),
            department: None,
            item_category: None,
        }
    }

    pub fn department<S: Into<String>>(mut self, department: S) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn item_category<S: Into<String>>(mut self, item_category: S) -> Self {
        self.item_category = Some(item_category.into());
        self
    }

    pub fn input(&self) -> ClassificationInput {
        ClassificationInput::new(
            self.title.as_str(),
            self.department.as_deref(),
            self.item_category.as_deref(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub chunk_size: usize,
    pub chunk_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Clamped to at least 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_chunk_delay(mut self, chunk_delay: Duration) -> Self {
        self.chunk_delay = chunk_delay;
        self
    }

    pub fn chunk_count(&self, items: usize) -> usize {
        items.div_ceil(self.chunk_size.max(1))
    }
}

impl TenderClassifier {
    /// Classifies every item. The result has one entry per distinct id; when an id
    /// repeats, the later item's category wins. Iteration order is unspecified.
    pub async fn classify_batch(
        &self,
        items: &[BatchItem],
        config: &BatchConfig,
    ) -> HashMap<TenderId, Category> {
        self.classify_batch_until(items, config, &AtomicBool::new(false))
            .await
    }

    /// Like [`TenderClassifier::classify_batch`], but checks `cancel` before each chunk.
    /// A cancelled run returns the chunks finished so far; in-flight chunks always complete.
    pub async fn classify_batch_until(
        &self,
        items: &[BatchItem],
        config: &BatchConfig,
        cancel: &AtomicBool,
    ) -> HashMap<TenderId, Category> {
        let chunk_size = config.chunk_size.max(1);
        let chunk_count = config.chunk_count(items.len());
        let mut results = HashMap::with_capacity(items.len());

        for (index, chunk) in items.chunks(chunk_size).enumerate() {
            if cancel.load(Ordering::Acquire) {
                crate::info!(
                    completed_chunks = index,
                    chunk_count,
                    "Batch classification cancelled at chunk boundary"
                );
                break;
            }

            let classified = join_all(chunk.iter().map(|item| async move {
                let input = item.input();
                (item.id, self.classify_input(&input).await)
            }))
            .await;
            results.extend(classified);

            crate::debug!(chunk = index + 1, chunk_count, "Classified chunk");

            if index + 1 < chunk_count {
                tokio::time::sleep(config.chunk_delay).await;
            }
        }

        crate::info!(
            items = items.len(),
            classified = results.len(),
            "Batch classification finished"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassificationInput, RemoteClassificationError, RemoteClassifier};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::time::Instant;

    fn items(n: usize) -> Vec<BatchItem> {
        (0..n as TenderId)
            .map(|id| BatchItem::new(id, format!("Repair of rural irrigation canal {id}")))
            .collect()
    }

    /// Tracks how many calls are in flight at once.
    struct SlowRemote {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RemoteClassifier for SlowRemote {
        fn name(&self) -> &str {
            "slow"
        }

        async fn try_classify(
            &self,
            _input: &ClassificationInput,
        ) -> Result<String, RemoteClassificationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("Machinery / Industrial".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn output_has_one_entry_per_input() {
        let classifier = TenderClassifier::keyword_only();
        for n in [0, 1, 4, 5, 6, 11, 23] {
            let items = items(n);
            let results = classifier.classify_batch(&items, &BatchConfig::new()).await;
            assert_eq!(results.len(), n);
            for item in &items {
                assert_eq!(
                    results[&item.id],
                    Category::AgricultureRuralDevelopment,
                    "id {}",
                    item.id
                );
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_only_between_chunks() {
        let classifier = TenderClassifier::keyword_only();

        let started = Instant::now();
        classifier.classify_batch(&items(11), &BatchConfig::new()).await;
        // 3 chunks -> 2 pauses.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(600), "{elapsed:?}");

        let started = Instant::now();
        classifier.classify_batch(&items(5), &BatchConfig::new()).await;
        assert_eq!(started.elapsed(), Duration::ZERO);

        let started = Instant::now();
        classifier.classify_batch(&[], &BatchConfig::new()).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn at_most_one_chunk_in_flight() {
        let remote = Arc::new(SlowRemote {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        });
        let classifier = TenderClassifier::with_remote(remote.clone());

        let started = Instant::now();
        let results = classifier.classify_batch(&items(12), &BatchConfig::new()).await;

        assert_eq!(results.len(), 12);
        assert!(results.values().all(|c| *c == Category::MachineryIndustrial));
        assert_eq!(remote.calls.load(Ordering::SeqCst), 12);
        assert_eq!(remote.max_in_flight.load(Ordering::SeqCst), 5);
        // 3 chunks of 50ms each, concurrent inside the chunk, plus 2 pauses.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(3 * 50 + 2 * 200), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(4 * 50 + 3 * 200), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn is_idempotent_without_remote() {
        let classifier = TenderClassifier::keyword_only();
        let items = vec![
            BatchItem::new(10, "Supply of surgical gloves"),
            BatchItem::new(11, "Purchase of blue widgets"),
            BatchItem::new(12, "Annual maintenance").department("Municipal Transport"),
            BatchItem::new(13, "Rate contract").item_category("Housekeeping services"),
        ];
        let first = classifier.classify_batch(&items, &BatchConfig::new()).await;
        let second = classifier.classify_batch(&items, &BatchConfig::new()).await;
        assert_eq!(first, second);
        assert_eq!(first[&10], Category::MedicalHealthcare);
        assert_eq!(first[&11], Category::Miscellaneous);
        assert_eq!(first[&12], Category::TransportAutomotive);
        assert_eq!(first[&13], Category::HousekeepingManpower);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_ids_keep_a_single_entry() {
        let classifier = TenderClassifier::keyword_only();
        let items = vec![
            BatchItem::new(1, "Purchase of blue widgets"),
            BatchItem::new(1, "Supply of surgical gloves"),
        ];
        let results = classifier.classify_batch(&items, &BatchConfig::new()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[&1], Category::MedicalHealthcare);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_at_chunk_boundary() {
        let classifier = TenderClassifier::keyword_only();
        let cancel = AtomicBool::new(true);
        let results = classifier
            .classify_batch_until(&items(11), &BatchConfig::new(), &cancel)
            .await;
        assert!(results.is_empty());
    }

    #[test]
    fn chunk_size_is_clamped() {
        let config = BatchConfig::new().with_chunk_size(0);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(BatchConfig::new().chunk_count(11), 3);
        assert_eq!(BatchConfig::new().chunk_count(0), 0);
    }

    #[test]
    fn batch_item_deserializes_from_camel_case() {
        let items: Vec<BatchItem> = serde_json::from_str(
            r#"[{"id":7,"title":"Bridge repair","department":"PWD","itemCategory":null}]"#,
        )
        .unwrap();
        assert_eq!(items[0], BatchItem::new(7, "Bridge repair").department("PWD"));
    }
}
