use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::eligibility::decision::{DecisionSnapshot, FactorReading, FootprintReading};
use crate::eligibility::offers::{
    CustomerId, Offer, OfferId, OfferStatus, OfferType, OFFER_VALIDITY_DAYS,
};
use crate::eligibility::profile::{DigitalFootprintLevel, Profile, ProfileInput};
use crate::eligibility::repository::{OfferStore, RepositoryError};
use crate::eligibility::service::InsightsService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn customer() -> CustomerId {
    CustomerId("cust-1042".to_string())
}

pub(super) fn profile_input(credit_score: i64, monthly_income: f64, age: i64) -> ProfileInput {
    ProfileInput {
        credit_score: Some(credit_score),
        monthly_income: Some(monthly_income),
        debt_to_income_ratio: Some(0.3),
        employment_months: Some(24),
        digital_footprint: Some(DigitalFootprintLevel::Medium),
        age: Some(age),
        location: None,
    }
}

pub(super) fn profile(credit_score: i64, monthly_income: f64, age: i64) -> Profile {
    Profile::from_input(profile_input(credit_score, monthly_income, age)).expect("valid profile")
}

/// Credit 720, income 45000, DTI 0.3, 24 months employed, age 35.
pub(super) fn salaried_profile() -> Profile {
    profile(720, 45_000.0, 35)
}

pub(super) fn persisted_offer(
    suffix: &str,
    offer_type: OfferType,
    issued_at: DateTime<Utc>,
    status: OfferStatus,
) -> Offer {
    Offer {
        id: OfferId(format!("OFR-legacy-{suffix}")),
        customer_id: customer(),
        offer_type,
        eligible_amount: 250_000,
        interest_rate: 12.5,
        processing_fee: 999,
        cashback_percent: None,
        reward_points: None,
        issued_at,
        expires_at: issued_at + Duration::days(OFFER_VALIDITY_DAYS),
        status,
        hidden_by_user: false,
    }
}

pub(super) fn denied_snapshot() -> DecisionSnapshot {
    DecisionSnapshot {
        decision_id: "dec-2026-0042".to_string(),
        outcome: "Denied".to_string(),
        credit_score: FactorReading::new(620.0, 700.0),
        monthly_income: FactorReading::new(38_000.0, 30_000.0),
        debt_to_income: FactorReading::new(0.6, 0.4),
        employment_months: FactorReading::new(18.0, 12.0),
        digital_footprint: Some(FootprintReading {
            actual: Some(DigitalFootprintLevel::High),
            required: DigitalFootprintLevel::Medium,
        }),
    }
}

pub(super) fn build_service() -> (InsightsService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = InsightsService::new(store.clone());
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) offers: Arc<Mutex<HashMap<CustomerId, Vec<Offer>>>>,
}

impl MemoryStore {
    pub(super) fn seed(&self, offer: Offer) {
        let mut guard = self.offers.lock().expect("store mutex poisoned");
        guard.entry(offer.customer_id.clone()).or_default().push(offer);
    }

    pub(super) fn stored(&self, customer_id: &CustomerId) -> Vec<Offer> {
        let guard = self.offers.lock().expect("store mutex poisoned");
        guard.get(customer_id).cloned().unwrap_or_default()
    }
}

impl OfferStore for MemoryStore {
    fn offers_for(&self, customer_id: &CustomerId) -> Result<Vec<Offer>, RepositoryError> {
        Ok(self.stored(customer_id))
    }

    fn upsert(&self, offer: Offer) -> Result<(), RepositoryError> {
        let mut guard = self.offers.lock().expect("store mutex poisoned");
        let records = guard.entry(offer.customer_id.clone()).or_default();
        match records.iter_mut().find(|stored| stored.id == offer.id) {
            Some(existing) => *existing = offer,
            None => records.push(offer),
        }
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl OfferStore for UnavailableStore {
    fn offers_for(&self, _: &CustomerId) -> Result<Vec<Offer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _: Offer) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
