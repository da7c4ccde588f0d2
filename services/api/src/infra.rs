use chrono::{DateTime, Utc};
use credit_insights::eligibility::{
    parse_timestamp, CustomerId, Offer, OfferStore, RepositoryError,
};
use credit_insights::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryOfferStore {
    records: Arc<Mutex<HashMap<CustomerId, Vec<Offer>>>>,
}

impl InMemoryOfferStore {
    pub(crate) fn extend(&self, offers: Vec<Offer>) {
        for offer in offers {
            // seeding never fails for the in-memory store
            let _ = self.upsert(offer);
        }
    }
}

impl OfferStore for InMemoryOfferStore {
    fn offers_for(&self, customer_id: &CustomerId) -> Result<Vec<Offer>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("offer store mutex poisoned".to_string()))?;
        Ok(guard.get(customer_id).cloned().unwrap_or_default())
    }

    fn upsert(&self, offer: Offer) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("offer store mutex poisoned".to_string()))?;
        let records = guard.entry(offer.customer_id.clone()).or_default();
        match records.iter_mut().find(|stored| stored.id == offer.id) {
            Some(existing) => *existing = offer,
            None => records.push(offer),
        }
        Ok(())
    }
}

/// Clap value parser for `--now`; accepts RFC 3339 timestamps or plain dates.
pub(crate) fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
