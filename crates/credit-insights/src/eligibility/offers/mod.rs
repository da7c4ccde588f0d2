//! Pre-approved offers: the record shape, the product rule table, and synthesis.

mod catalog;
mod synthesizer;

pub use catalog::{product_catalog, EligibilityRule, ProductDefinition};
pub use synthesizer::{fresh_offers, synthesize_offers};

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days an offer stays valid after issue.
pub const OFFER_VALIDITY_DAYS: i64 = 30;

/// Identifier wrapper for customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferId(pub String);

impl OfferId {
    /// Same customer, product and issue day always yield the same id.
    pub fn derive(
        customer_id: &CustomerId,
        offer_type: OfferType,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self(format!(
            "OFR-{}-{}-{}",
            customer_id.0,
            offer_type.code(),
            issued_at.format("%Y%m%d")
        ))
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferType {
    CreditCard,
    PersonalLoan,
    CarLoan,
    HomeLoan,
    Premium,
    Subscription,
    AppUpgrade,
    #[serde(other)]
    Other,
}

impl OfferType {
    pub const fn code(self) -> &'static str {
        match self {
            Self::CreditCard => "CREDIT_CARD",
            Self::PersonalLoan => "PERSONAL_LOAN",
            Self::CarLoan => "CAR_LOAN",
            Self::HomeLoan => "HOME_LOAN",
            Self::Premium => "PREMIUM",
            Self::Subscription => "SUBSCRIPTION",
            Self::AppUpgrade => "APP_UPGRADE",
            Self::Other => "OTHER",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::PersonalLoan => "Personal Loan",
            Self::CarLoan => "Car Loan",
            Self::HomeLoan => "Home Loan",
            Self::Premium => "Premium Membership",
            Self::Subscription => "Subscription",
            Self::AppUpgrade => "App Upgrade",
            Self::Other => "Other",
        }
    }

    /// Upsell kinds that never surface as pre-approved credit offers.
    pub const fn is_promotional(self) -> bool {
        matches!(self, Self::Premium | Self::Subscription | Self::AppUpgrade)
    }

    /// Lenient parse used by imports; unknown codes map to [`OfferType::Other`].
    pub fn from_code(value: &str) -> Self {
        let normalized = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "CREDIT_CARD" => Self::CreditCard,
            "PERSONAL_LOAN" => Self::PersonalLoan,
            "CAR_LOAN" => Self::CarLoan,
            "HOME_LOAN" => Self::HomeLoan,
            "PREMIUM" => Self::Premium,
            "SUBSCRIPTION" => Self::Subscription,
            "APP_UPGRADE" => Self::AppUpgrade,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Active,
    Accepted,
    Rejected,
    Expired,
}

impl OfferStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

/// Customer response to a surfaced offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferResponse {
    Accept,
    Reject,
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferTransitionError {
    #[error("offer {id} is {status} and can no longer be {action}")]
    NotActive {
        id: OfferId,
        status: &'static str,
        action: &'static str,
    },
}

/// A synthesized or persisted pre-approved product recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub customer_id: CustomerId,
    pub offer_type: OfferType,
    pub eligible_amount: u64,
    pub interest_rate: f32,
    pub processing_fee: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cashback_percent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_points: Option<u32>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: OfferStatus,
    #[serde(default)]
    pub hidden_by_user: bool,
}

impl Offer {
    pub fn from_product(
        product: &ProductDefinition,
        customer_id: &CustomerId,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OfferId::derive(customer_id, product.offer_type, issued_at),
            customer_id: customer_id.clone(),
            offer_type: product.offer_type,
            eligible_amount: product.eligible_amount,
            interest_rate: product.interest_rate,
            processing_fee: product.processing_fee,
            cashback_percent: product.cashback_percent,
            reward_points: product.reward_points,
            issued_at,
            expires_at: issued_at + Duration::days(OFFER_VALIDITY_DAYS),
            status: OfferStatus::Active,
            hidden_by_user: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Stored status with expiry applied; accepted and rejected offers keep their status.
    pub fn effective_status(&self, now: DateTime<Utc>) -> OfferStatus {
        match self.status {
            OfferStatus::Active if self.is_expired(now) => OfferStatus::Expired,
            status => status,
        }
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.status == OfferStatus::Active && !self.hidden_by_user && !self.is_expired(now)
    }

    pub fn accept(&mut self, now: DateTime<Utc>) -> Result<(), OfferTransitionError> {
        self.transition(now, OfferStatus::Accepted, "accepted")
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<(), OfferTransitionError> {
        self.transition(now, OfferStatus::Rejected, "rejected")
    }

    pub fn hide(&mut self) {
        self.hidden_by_user = true;
    }

    pub fn respond(
        &mut self,
        response: OfferResponse,
        now: DateTime<Utc>,
    ) -> Result<(), OfferTransitionError> {
        match response {
            OfferResponse::Accept => self.accept(now),
            OfferResponse::Reject => self.reject(now),
            OfferResponse::Hide => {
                self.hide();
                Ok(())
            }
        }
    }

    fn transition(
        &mut self,
        now: DateTime<Utc>,
        target: OfferStatus,
        action: &'static str,
    ) -> Result<(), OfferTransitionError> {
        let current = self.effective_status(now);
        if current != OfferStatus::Active {
            return Err(OfferTransitionError::NotActive {
                id: self.id.clone(),
                status: current.label(),
                action,
            });
        }
        self.status = target;
        Ok(())
    }
}
