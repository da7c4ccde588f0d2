use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::counterfactual::{generate_scenarios, CounterfactualScenario, PathSelection};
use super::decision::{compare_factors, rank_failing, DecisionFactor, DecisionSnapshot};
use super::narration::{narrate_plan, Narration, ScenarioNarrator, TemplateNarrator};
use super::offers::{
    synthesize_offers, CustomerId, Offer, OfferId, OfferResponse, OfferTransitionError,
};
use super::profile::Profile;
use super::repository::{OfferStore, RepositoryError};

/// Service composing the offer store, the rule engine and the narrator.
pub struct InsightsService<S> {
    store: Arc<S>,
    narrator: Arc<dyn ScenarioNarrator>,
}

impl<S> InsightsService<S>
where
    S: OfferStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_narrator(store, Arc::new(TemplateNarrator))
    }

    pub fn with_narrator(store: Arc<S>, narrator: Arc<dyn ScenarioNarrator>) -> Self {
        Self { store, narrator }
    }

    /// Offers to show `customer_id` right now.
    ///
    /// An unreachable store is treated as "no persisted offers". Newly
    /// synthesized offers are written back so later responses can find them;
    /// write failures are logged and do not hide the offers.
    pub fn offers_for(
        &self,
        customer_id: &CustomerId,
        profile: &Profile,
        now: DateTime<Utc>,
    ) -> Vec<Offer> {
        let persisted = match self.store.offers_for(customer_id) {
            Ok(offers) => offers,
            Err(err) => {
                warn!(
                    customer = %customer_id,
                    error = %err,
                    "offer store unavailable; synthesizing only"
                );
                Vec::new()
            }
        };

        let offers = synthesize_offers(profile, customer_id, &persisted, now);

        for offer in offers
            .iter()
            .filter(|offer| !persisted.iter().any(|stored| stored.id == offer.id))
        {
            if let Err(err) = self.store.upsert(offer.clone()) {
                warn!(offer = %offer.id, error = %err, "failed to persist synthesized offer");
            }
        }

        info!(customer = %customer_id, count = offers.len(), "offers resolved");
        offers
    }

    /// Record a customer's response to one of their offers.
    pub fn respond(
        &self,
        customer_id: &CustomerId,
        offer_id: &OfferId,
        response: OfferResponse,
        now: DateTime<Utc>,
    ) -> Result<Offer, InsightsServiceError> {
        let mut offer = self
            .store
            .offers_for(customer_id)?
            .into_iter()
            .find(|offer| offer.id == *offer_id)
            .ok_or(RepositoryError::NotFound)?;

        offer.respond(response, now)?;
        self.store.upsert(offer.clone())?;

        info!(
            customer = %customer_id,
            offer = %offer_id,
            ?response,
            status = offer.status.label(),
            "offer response recorded"
        );
        Ok(offer)
    }

    pub fn explain(&self, decision: &DecisionSnapshot) -> DecisionExplanation {
        explain_decision(decision, self.narrator.as_ref())
    }
}

/// Error raised by the insights service.
#[derive(Debug, thiserror::Error)]
pub enum InsightsServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Transition(#[from] OfferTransitionError),
}

/// Serializable form of a path selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathSummary {
    Scenario {
        scenario_name: String,
        changed_factor: String,
        impact_on_approval_percent: u8,
    },
    NoImprovementNeeded,
}

impl From<PathSelection<'_>> for PathSummary {
    fn from(selection: PathSelection<'_>) -> Self {
        match selection {
            PathSelection::Scenario(scenario) => PathSummary::Scenario {
                scenario_name: scenario.scenario_name.clone(),
                changed_factor: scenario.changed_factor.clone(),
                impact_on_approval_percent: scenario.impact_on_approval_percent,
            },
            PathSelection::NoImprovementNeeded => PathSummary::NoImprovementNeeded,
        }
    }
}

/// Everything a transparency screen needs to explain one decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionExplanation {
    pub decision_id: String,
    pub outcome: String,
    pub denied: bool,
    pub factors: Vec<DecisionFactor>,
    /// Failing factor names, most severe first.
    pub failing_factors: Vec<String>,
    pub scenarios: Vec<CounterfactualScenario>,
    pub narrations: Vec<Narration>,
    pub easiest_path: PathSummary,
    pub fastest_path: PathSummary,
    pub most_impactful: PathSummary,
}

pub fn explain_decision<N>(decision: &DecisionSnapshot, narrator: &N) -> DecisionExplanation
where
    N: ScenarioNarrator + ?Sized,
{
    let factors = compare_factors(decision);
    let failing_factors = rank_failing(&factors)
        .into_iter()
        .map(|factor| factor.name.clone())
        .collect();

    let mut plan = generate_scenarios(&factors);
    let narrations = narrate_plan(&mut plan, narrator);

    let easiest_path = plan.easiest_path().into();
    let fastest_path = plan.fastest_path().into();
    let most_impactful = plan.most_impactful().into();

    DecisionExplanation {
        decision_id: decision.decision_id.clone(),
        outcome: decision.outcome.clone(),
        denied: decision.is_denied(),
        factors,
        failing_factors,
        scenarios: plan.into_scenarios(),
        narrations,
        easiest_path,
        fastest_path,
        most_impactful,
    }
}

