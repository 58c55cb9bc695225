use crate::{categories::Category, store::TenderStore};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    /// Subscribers with at least one matching tender.
    pub clients_notified: usize,
    pub alerts_logged: usize,
    pub total_clients: usize,
}

/// Strict check of a subscriber's requested interest against the closed category set.
pub fn validate_interest(label: &str) -> crate::Result<Category> {
    label
        .parse::<Category>()
        .map_err(|e| crate::anyhow!("Invalid category: {e}"))
}

/// Matches tenders created since `since` against each subscriber's interest and logs
/// one alert per (subscriber, tender) pair. Subscribers without an email are skipped.
///
/// Delivery is out of scope: the alert log is the record of what would be sent.
pub async fn send_daily_alerts(
    store: &dyn TenderStore,
    since: DateTime<Utc>,
) -> crate::Result<AlertReport> {
    let subscribers = store.subscribers().await?;
    let tenders = store.tenders_since(since).await?;

    let mut report = AlertReport {
        total_clients: subscribers.len(),
        ..Default::default()
    };

    for subscriber in &subscribers {
        let Some(email) = subscriber.email.as_deref() else {
            continue;
        };
        let matching: Vec<_> = tenders
            .iter()
            .filter(|t| t.category == Some(subscriber.category_interested))
            .collect();
        if matching.is_empty() {
            continue;
        }

        for tender in &matching {
            store.record_alert(subscriber.client_id, tender.id).await?;
            report.alerts_logged += 1;
        }
        report.clients_notified += 1;
        crate::info!(
            client_id = subscriber.client_id,
            email,
            tenders = matching.len(),
            "Would send tender alert"
        );
    }

    crate::info!(
        clients_notified = report.clients_notified,
        total_clients = report.total_clients,
        "Alert job completed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory::InMemoryTenderStore, NewTender, Subscriber};
    use chrono::Duration;

    async fn insert(store: &InMemoryTenderStore, title: &str, category: Option<Category>) -> i64 {
        store
            .insert_tender(
                NewTender {
                    portal_name: "GeM".to_string(),
                    bid_number: format!("GEM/{title}"),
                    title: title.to_string(),
                    ..Default::default()
                },
                category,
            )
            .await
            .unwrap()
            .id
    }

    fn subscriber(client_id: i64, email: Option<&str>, interest: Category) -> Subscriber {
        Subscriber {
            client_id,
            company_name: format!("Company {client_id}"),
            email: email.map(str::to_string),
            category_interested: interest,
        }
    }

    #[test]
    fn interest_must_be_an_exact_label() {
        assert_eq!(
            validate_interest("Medical / Healthcare").unwrap(),
            Category::MedicalHealthcare
        );
        assert!(validate_interest("medical").is_err());
        assert!(validate_interest("").is_err());
    }

    #[tokio::test]
    async fn logs_one_alert_per_matching_tender() {
        let store = InMemoryTenderStore::new();
        let road = insert(&store, "Road widening", Some(Category::ConstructionCivil)).await;
        let bridge = insert(&store, "Bridge repair", Some(Category::ConstructionCivil)).await;
        insert(&store, "Hospital beds", Some(Category::MedicalHealthcare)).await;
        insert(&store, "Unsorted", None).await;
        let stale = insert(&store, "Old flyover", Some(Category::ConstructionCivil)).await;
        store
            .backdate(stale, Utc::now() - Duration::days(2))
            .await
            .unwrap();

        store
            .add_subscriber(subscriber(1, Some("a@example.com"), Category::ConstructionCivil))
            .await;
        store
            .add_subscriber(subscriber(2, None, Category::ConstructionCivil))
            .await;
        store
            .add_subscriber(subscriber(3, Some("c@example.com"), Category::SecurityDefence))
            .await;

        let report = send_daily_alerts(&store, Utc::now() - Duration::days(1))
            .await
            .unwrap();
        assert_eq!(
            report,
            AlertReport {
                clients_notified: 1,
                alerts_logged: 2,
                total_clients: 3,
            }
        );

        let logged: Vec<_> = store
            .alerts()
            .await
            .iter()
            .map(|a| (a.client_id, a.tender_id))
            .collect();
        assert_eq!(logged, vec![(1, road), (1, bridge)]);
    }

    #[tokio::test]
    async fn no_subscribers_is_an_empty_report() {
        let store = InMemoryTenderStore::new();
        let report = send_daily_alerts(&store, Utc::now()).await.unwrap();
        assert_eq!(report, AlertReport::default());
    }
}
