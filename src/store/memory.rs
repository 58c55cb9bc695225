use super::{
    AlertLog,
    ClientId,
    NewTender,
    StoreError,
    Subscriber,
    TenderRecord,
    TenderStore,
};
use crate::{batch::TenderId, categories::Category};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    tenders: BTreeMap<TenderId, TenderRecord>,
    next_id: TenderId,
    subscribers: Vec<Subscriber>,
    alerts: Vec<AlertLog>,
    failing_writes: HashSet<TenderId>,
}

/// In-memory tender store.
///
/// Intended for tests and local runs. Ids are assigned from 1 in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTenderStore {
    state: RwLock<State>,
}

impl InMemoryTenderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_subscriber(&self, subscriber: Subscriber) {
        self.state.write().await.subscribers.push(subscriber);
    }

    pub async fn tender(&self, id: TenderId) -> Option<TenderRecord> {
        self.state.read().await.tenders.get(&id).cloned()
    }

    pub async fn tenders(&self) -> Vec<TenderRecord> {
        self.state.read().await.tenders.values().cloned().collect()
    }

    pub async fn alerts(&self) -> Vec<AlertLog> {
        self.state.read().await.alerts.clone()
    }

    /// Makes every later `set_category` for `id` fail with a backend error.
    pub async fn fail_writes_for(&self, id: TenderId) {
        self.state.write().await.failing_writes.insert(id);
    }

    /// Rewrites a tender's creation time.
    pub async fn backdate(&self, id: TenderId, created_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let tender = state.tenders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        tender.created_at = created_at;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TenderStore for InMemoryTenderStore {
    async fn uncategorized(&self) -> Result<Vec<TenderRecord>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .tenders
            .values()
            .filter(|t| t.category.is_none())
            .cloned()
            .collect())
    }

    async fn set_category(&self, id: TenderId, category: Category) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.failing_writes.contains(&id) {
            return Err(StoreError::Backend(format!(
                "write rejected for tender {id}"
            )));
        }
        let tender = state.tenders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        tender.category = Some(category);
        Ok(())
    }

    async fn insert_tender(
        &self,
        tender: NewTender,
        category: Option<Category>,
    ) -> Result<TenderRecord, StoreError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let record = TenderRecord {
            id: state.next_id,
            portal_name: tender.portal_name,
            bid_number: tender.bid_number,
            title: tender.title,
            department: tender.department,
            item_category: tender.item_category,
            state_location: tender.state_location,
            estimated_value: tender.estimated_value,
            bid_end_date: tender.bid_end_date,
            source_url: tender.source_url,
            category,
            created_at: Utc::now(),
        };
        state.tenders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn tenders_since(&self, since: DateTime<Utc>) -> Result<Vec<TenderRecord>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .tenders
            .values()
            .filter(|t| t.created_at >= since)
            .cloned()
            .collect())
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        Ok(self.state.read().await.subscribers.clone())
    }

    async fn record_alert(
        &self,
        client_id: ClientId,
        tender_id: TenderId,
    ) -> Result<AlertLog, StoreError> {
        let mut state = self.state.write().await;
        if !state.tenders.contains_key(&tender_id) {
            return Err(StoreError::NotFound(tender_id));
        }
        let log = AlertLog {
            client_id,
            tender_id,
            sent_at: Utc::now(),
        };
        state.alerts.push(log.clone());
        Ok(log)
    }
}
