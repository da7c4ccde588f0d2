//! Eligibility and counterfactual rule engine.
//!
//! [`offers::synthesize_offers`], [`decision::compare_factors`] and
//! [`counterfactual::generate_scenarios`] are pure functions over their
//! inputs. The store, service and router wrap them for callers that need
//! persistence or HTTP.

pub mod counterfactual;
pub mod decision;
pub mod import;
pub mod narration;
pub mod offers;
pub mod profile;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use counterfactual::{
    generate_scenarios, CounterfactualScenario, Difficulty, PathSelection, ScenarioPlan, Timeframe,
};
pub use decision::{
    compare_factors, rank_failing, DecisionFactor, DecisionSnapshot, FactorKind, FactorReading,
    FactorValue, FootprintReading,
};
pub use import::{parse_timestamp, OfferCsvImporter, OfferImportError};
pub use narration::{
    narrate_plan, prompt_context, Narration, NarrationError, ScenarioNarrator, TemplateNarrator,
};
pub use offers::{
    fresh_offers, product_catalog, synthesize_offers, CustomerId, Offer, OfferId, OfferResponse,
    OfferStatus, OfferTransitionError, OfferType, ProductDefinition,
};
pub use profile::{DigitalFootprintLevel, LocationType, Profile, ProfileError, ProfileInput};
pub use repository::{OfferStore, RepositoryError};
pub use router::insights_router;
pub use service::{
    explain_decision, DecisionExplanation, InsightsService, InsightsServiceError, PathSummary,
};
