//! Record store consumed by the categorization jobs.
//!
//! Tenders, subscribers and alert logs live behind [`TenderStore`]. Persistence is
//! per id with upsert semantics; no operation spans more than one record.

pub mod memory;

use crate::{
    batch::{BatchItem, TenderId},
    categories::Category,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ClientId = i64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("tender {0} not found")]
    NotFound(TenderId),
    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderRecord {
    pub id: TenderId,
    /// GeM, eProcure, MahaTenders, ...
    pub portal_name: String,
    pub bid_number: String,
    pub title: String,
    pub department: Option<String>,
    pub item_category: Option<String>,
    pub state_location: Option<String>,
    /// Decimal amount as written by the portal.
    pub estimated_value: Option<String>,
    pub bid_end_date: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
    /// None until classified.
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
}

impl TenderRecord {
    pub fn batch_item(&self) -> BatchItem {
        BatchItem {
            id: self.id,
            title: self.title.clone(),
            department: self.department.clone(),
            item_category: self.item_category.clone(),
        }
    }
}

/// A tender as submitted, before the store assigns an id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTender {
    pub portal_name: String,
    pub bid_number: String,
    pub title: String,
    pub department: Option<String>,
    pub item_category: Option<String>,
    pub state_location: Option<String>,
    pub estimated_value: Option<String>,
    pub bid_end_date: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub client_id: ClientId,
    pub company_name: String,
    /// Clients without a login email cannot be alerted.
    pub email: Option<String>,
    pub category_interested: Category,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertLog {
    pub client_id: ClientId,
    pub tender_id: TenderId,
    pub sent_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait TenderStore: Send + Sync {
    /// Every tender whose category is still unset.
    async fn uncategorized(&self) -> Result<Vec<TenderRecord>, StoreError>;

    /// Sets the category for one tender. Writing the same value twice is harmless.
    async fn set_category(&self, id: TenderId, category: Category) -> Result<(), StoreError>;

    async fn insert_tender(
        &self,
        tender: NewTender,
        category: Option<Category>,
    ) -> Result<TenderRecord, StoreError>;

    /// Tenders created at or after `since`.
    async fn tenders_since(&self, since: DateTime<Utc>) -> Result<Vec<TenderRecord>, StoreError>;

    async fn subscribers(&self) -> Result<Vec<Subscriber>, StoreError>;

    async fn record_alert(
        &self,
        client_id: ClientId,
        tender_id: TenderId,
    ) -> Result<AlertLog, StoreError>;
}
