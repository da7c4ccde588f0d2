//! "What-if" scenarios describing the smallest change that flips a failing factor.

mod templates;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::decision::{DecisionFactor, FactorKind, FactorValue};
use templates::template_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Expected duration range, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub min_months: u16,
    pub max_months: u16,
}

impl Timeframe {
    pub const fn months(min_months: u16, max_months: u16) -> Self {
        Self {
            min_months,
            max_months,
        }
    }

    fn sort_key(&self) -> (u16, u16) {
        (self.max_months, self.min_months)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min_months == self.max_months {
            write!(f, "{} months", self.max_months)
        } else {
            write!(f, "{}-{} months", self.min_months, self.max_months)
        }
    }
}

/// Minimal change to one failing factor that would satisfy its requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualScenario {
    pub scenario_name: String,
    pub changed_factor: String,
    pub factor_kind: FactorKind,
    pub from_value: FactorValue,
    pub to_value: FactorValue,
    pub impact_on_approval_percent: u8,
    pub difficulty: Difficulty,
    pub timeframe: Timeframe,
    pub cost_estimate: String,
    pub action_steps: Vec<String>,
}

impl CounterfactualScenario {
    fn from_factor(factor: &DecisionFactor) -> Self {
        let template = template_for(factor.kind);
        let verb = if factor.kind.higher_is_better() {
            "Raise"
        } else {
            "Reduce"
        };

        Self {
            scenario_name: format!("{verb} {} to {}", factor.name, factor.required_value),
            changed_factor: factor.name.clone(),
            factor_kind: factor.kind,
            from_value: factor.actual_value,
            to_value: factor.required_value,
            impact_on_approval_percent: impact_for_gap(relative_gap(factor)),
            difficulty: template.difficulty,
            timeframe: template.timeframe,
            cost_estimate: template.cost_estimate.to_string(),
            action_steps: template
                .action_steps
                .iter()
                .map(|step| step.to_string())
                .collect(),
        }
    }
}

/// Outcome of a path selection over a plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSelection<'a> {
    Scenario(&'a CounterfactualScenario),
    NoImprovementNeeded,
}

impl<'a> PathSelection<'a> {
    pub fn scenario(self) -> Option<&'a CounterfactualScenario> {
        match self {
            PathSelection::Scenario(scenario) => Some(scenario),
            PathSelection::NoImprovementNeeded => None,
        }
    }

    pub fn improvement_needed(self) -> bool {
        matches!(self, PathSelection::Scenario(_))
    }
}

/// Scenarios for one decision, in the order their factors were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPlan {
    scenarios: Vec<CounterfactualScenario>,
}

impl ScenarioPlan {
    pub fn scenarios(&self) -> &[CounterfactualScenario] {
        &self.scenarios
    }

    pub fn scenarios_mut(&mut self) -> &mut [CounterfactualScenario] {
        &mut self.scenarios
    }

    pub fn into_scenarios(self) -> Vec<CounterfactualScenario> {
        self.scenarios
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Lowest difficulty.
    pub fn easiest_path(&self) -> PathSelection<'_> {
        self.first_minimal_by(|scenario| scenario.difficulty)
    }

    /// Shortest upper bound on the timeframe, then shortest lower bound.
    pub fn fastest_path(&self) -> PathSelection<'_> {
        self.first_minimal_by(|scenario| scenario.timeframe.sort_key())
    }

    /// Highest approval impact.
    pub fn most_impactful(&self) -> PathSelection<'_> {
        self.first_minimal_by(|scenario| std::cmp::Reverse(scenario.impact_on_approval_percent))
    }

    // `Iterator::min_by_key` already returns the first of equal minima.
    fn first_minimal_by<K, F>(&self, key: F) -> PathSelection<'_>
    where
        K: Ord,
        F: Fn(&CounterfactualScenario) -> K,
    {
        self.scenarios
            .iter()
            .min_by_key(|scenario| key(scenario))
            .map_or(PathSelection::NoImprovementNeeded, PathSelection::Scenario)
    }
}

/// One scenario per failing factor; passing factors are skipped.
pub fn generate_scenarios(factors: &[DecisionFactor]) -> ScenarioPlan {
    let scenarios = factors
        .iter()
        .filter(|factor| !factor.passed)
        .map(CounterfactualScenario::from_factor)
        .collect();

    ScenarioPlan { scenarios }
}

/// Monthly income range used to normalize income shortfalls.
const INCOME_GAP_SCALE: f64 = 100_000.0;

/// Gap to the requirement as a fraction of the factor's typical range.
pub fn relative_gap(factor: &DecisionFactor) -> f64 {
    let scale = match factor.kind {
        FactorKind::CreditScore => 600.0,
        FactorKind::MonthlyIncome => INCOME_GAP_SCALE,
        FactorKind::DebtToIncome => 1.0,
        FactorKind::EmploymentDuration => 60.0,
        FactorKind::DigitalFootprint => 2.0,
    };

    if !(scale.is_finite() && scale > 0.0) {
        return 0.0;
    }
    factor.shortfall() / scale
}

/// Saturating curve: small gaps register a modest impact, large gaps approach 100.
pub fn impact_for_gap(gap: f64) -> u8 {
    if !gap.is_finite() || gap <= 0.0 {
        return 0;
    }
    let impact = 5.0 + 95.0 * (1.0 - (-3.0 * gap).exp());
    impact.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::profile::DigitalFootprintLevel;

    fn numeric(kind: FactorKind, actual: f64, required: f64) -> DecisionFactor {
        DecisionFactor::evaluate(
            kind,
            FactorValue::Numeric(actual),
            FactorValue::Numeric(required),
        )
    }

    #[test]
    fn credit_score_scenario_targets_requirement() {
        let plan = generate_scenarios(&[numeric(FactorKind::CreditScore, 620.0, 700.0)]);

        assert_eq!(plan.len(), 1);
        let scenario = &plan.scenarios()[0];
        assert_eq!(scenario.changed_factor, "Credit Score");
        assert_eq!(scenario.to_value, FactorValue::Numeric(700.0));
        assert_eq!(scenario.from_value, FactorValue::Numeric(620.0));
        assert_eq!(scenario.difficulty, Difficulty::Medium);
        assert_eq!(scenario.timeframe.to_string(), "3-6 months");
        assert_eq!(scenario.scenario_name, "Raise Credit Score to 700");
        assert!(!scenario.action_steps.is_empty());
    }

    #[test]
    fn passing_factors_produce_nothing() {
        let plan = generate_scenarios(&[
            numeric(FactorKind::CreditScore, 780.0, 700.0),
            numeric(FactorKind::DebtToIncome, 0.2, 0.4),
        ]);

        assert!(plan.is_empty());
        assert_eq!(plan.easiest_path(), PathSelection::NoImprovementNeeded);
        assert_eq!(plan.fastest_path(), PathSelection::NoImprovementNeeded);
        assert_eq!(plan.most_impactful(), PathSelection::NoImprovementNeeded);
    }

    #[test]
    fn empty_input_reports_no_improvement_needed() {
        let plan = generate_scenarios(&[]);
        assert!(!plan.most_impactful().improvement_needed());
        assert!(plan.easiest_path().scenario().is_none());
    }

    #[test]
    fn debt_scenario_reduces_toward_limit() {
        let plan = generate_scenarios(&[numeric(FactorKind::DebtToIncome, 0.55, 0.4)]);
        let scenario = &plan.scenarios()[0];
        assert_eq!(scenario.scenario_name, "Reduce Debt-to-Income Ratio to 0.40");
        assert_eq!(scenario.to_value, FactorValue::Numeric(0.4));
    }

    #[test]
    fn impact_grows_with_gap() {
        let near = numeric(FactorKind::CreditScore, 690.0, 700.0);
        let far = numeric(FactorKind::CreditScore, 520.0, 700.0);
        let plan = generate_scenarios(&[near, far]);

        let impacts: Vec<u8> = plan
            .scenarios()
            .iter()
            .map(|scenario| scenario.impact_on_approval_percent)
            .collect();
        assert!(impacts[1] > impacts[0]);
    }

    #[test]
    fn income_impact_follows_absolute_shortfall_across_requirements() {
        let wide = numeric(FactorKind::MonthlyIncome, 50_000.0, 200_000.0);
        let narrow = numeric(FactorKind::MonthlyIncome, 1_000.0, 20_000.0);
        let plan = generate_scenarios(&[wide, narrow]);

        let impacts: Vec<u8> = plan
            .scenarios()
            .iter()
            .map(|scenario| scenario.impact_on_approval_percent)
            .collect();
        assert!(
            impacts[0] >= impacts[1],
            "150000 shortfall scored {} below 19000 shortfall at {}",
            impacts[0],
            impacts[1]
        );
    }

    #[test]
    fn impact_curve_is_monotonic_and_bounded() {
        let mut previous = 0;
        for step in 0..=400 {
            let impact = impact_for_gap(step as f64 * 0.01);
            assert!(impact >= previous, "impact dropped at step {step}");
            assert!(impact <= 100);
            previous = impact;
        }
        assert_eq!(impact_for_gap(0.0), 0);
        assert_eq!(impact_for_gap(f64::NAN), 0);
        assert_eq!(impact_for_gap(50.0), 100);
    }

    #[test]
    fn path_selection_prefers_earliest_on_ties() {
        let plan = generate_scenarios(&[
            numeric(FactorKind::CreditScore, 640.0, 700.0),
            numeric(FactorKind::DebtToIncome, 0.5, 0.4),
            numeric(FactorKind::EmploymentDuration, 6.0, 12.0),
            DecisionFactor::evaluate(
                FactorKind::DigitalFootprint,
                FactorValue::Level(DigitalFootprintLevel::Low),
                FactorValue::Level(DigitalFootprintLevel::Medium),
            ),
        ]);

        let easiest = plan.easiest_path().scenario().expect("scenario");
        assert_eq!(easiest.factor_kind, FactorKind::EmploymentDuration);

        let fastest = plan.fastest_path().scenario().expect("scenario");
        assert_eq!(fastest.factor_kind, FactorKind::DigitalFootprint);

        // footprint gap 0.5 outweighs credit 0.1, debt 0.1, tenure 0.1
        let impactful = plan.most_impactful().scenario().expect("scenario");
        assert_eq!(impactful.factor_kind, FactorKind::DigitalFootprint);
    }

    #[test]
    fn equal_impacts_resolve_to_first_scenario() {
        let plan = generate_scenarios(&[
            numeric(FactorKind::CreditScore, 640.0, 700.0),
            numeric(FactorKind::DebtToIncome, 0.5, 0.4),
        ]);
        let impactful = plan.most_impactful().scenario().expect("scenario");
        assert_eq!(impactful.factor_kind, FactorKind::CreditScore);
    }
}
