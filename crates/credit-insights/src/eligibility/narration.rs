//! Optional natural-language enrichment layered over the deterministic scenarios.
//!
//! A generative-text collaborator can implement [`ScenarioNarrator`]; when it
//! fails, the static template text already carried by each scenario is kept,
//! so nothing in the engine depends on network access.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::counterfactual::{CounterfactualScenario, ScenarioPlan};
use super::decision::DecisionFactor;
use super::offers::Offer;
use super::profile::Profile;

/// Narrated text for a single scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narration {
    pub summary: String,
    pub action_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrationError {
    #[error("narration backend unavailable: {0}")]
    Unavailable(String),
    #[error("narration backend returned an empty response")]
    Empty,
}

pub trait ScenarioNarrator: Send + Sync {
    fn narrate(&self, scenario: &CounterfactualScenario) -> Result<Narration, NarrationError>;
}

/// Offline narrator built purely from the scenario's own template fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl ScenarioNarrator for TemplateNarrator {
    fn narrate(&self, scenario: &CounterfactualScenario) -> Result<Narration, NarrationError> {
        Ok(template_narration(scenario))
    }
}

pub fn template_narration(scenario: &CounterfactualScenario) -> Narration {
    Narration {
        summary: format!(
            "Moving your {} from {} to {} could improve approval odds by about {}%. \
             Expect {} effort over {}.",
            scenario.changed_factor,
            scenario.from_value,
            scenario.to_value,
            scenario.impact_on_approval_percent,
            scenario.difficulty.label().to_ascii_lowercase(),
            scenario.timeframe
        ),
        action_steps: scenario.action_steps.clone(),
    }
}

/// Narrate every scenario of `plan`, replacing action steps when the narrator
/// succeeds with a non-empty list.
pub fn narrate_plan<N>(plan: &mut ScenarioPlan, narrator: &N) -> Vec<Narration>
where
    N: ScenarioNarrator + ?Sized,
{
    plan.scenarios_mut()
        .iter_mut()
        .map(|scenario| match narrator.narrate(scenario) {
            Ok(narration) if !narration.action_steps.is_empty() => {
                scenario.action_steps = narration.action_steps.clone();
                narration
            }
            Ok(narration) => Narration {
                summary: narration.summary,
                action_steps: scenario.action_steps.clone(),
            },
            Err(err) => {
                warn!(
                    scenario = %scenario.scenario_name,
                    error = %err,
                    "narration failed; using template text"
                );
                template_narration(scenario)
            }
        })
        .collect()
}

/// Plain-text context handed to a conversational assistant.
pub fn prompt_context(profile: &Profile, factors: &[DecisionFactor], offers: &[Offer]) -> String {
    let mut context = String::new();

    context.push_str("Customer profile:\n");
    let _ = writeln!(context, "- Credit score: {}", profile.credit_score());
    let _ = writeln!(context, "- Monthly income: {:.0}", profile.monthly_income());
    let _ = writeln!(
        context,
        "- Debt-to-income ratio: {:.2}",
        profile.debt_to_income_ratio()
    );
    let _ = writeln!(
        context,
        "- Employment: {} months",
        profile.employment_months()
    );
    let _ = writeln!(
        context,
        "- Digital footprint: {}",
        profile.digital_footprint()
    );
    let _ = writeln!(context, "- Age: {}", profile.age());
    let _ = writeln!(context, "- Location: {}", profile.location().label());

    if !factors.is_empty() {
        context.push_str("\nLatest decision factors:\n");
        for factor in factors {
            let _ = writeln!(
                context,
                "- {}: actual {}, required {} ({})",
                factor.name,
                factor.actual_value,
                factor.required_value,
                if factor.passed { "passed" } else { "failed" }
            );
        }
    }

    if offers.is_empty() {
        context.push_str("\nNo pre-approved offers are currently available.\n");
    } else {
        context.push_str("\nPre-approved offers:\n");
        for offer in offers {
            let _ = writeln!(
                context,
                "- {}: up to {} at {:.2}% (fee {}), valid until {}",
                offer.offer_type.label(),
                offer.eligible_amount,
                offer.interest_rate,
                offer.processing_fee,
                offer.expires_at.format("%Y-%m-%d")
            );
        }
    }

    context
}
