//! Per-factor comparison of a loan decision's actual and required values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::profile::DigitalFootprintLevel;

/// The five criteria evaluated on every loan decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    CreditScore,
    MonthlyIncome,
    DebtToIncome,
    EmploymentDuration,
    DigitalFootprint,
}

impl FactorKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::CreditScore,
            Self::MonthlyIncome,
            Self::DebtToIncome,
            Self::EmploymentDuration,
            Self::DigitalFootprint,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditScore => "Credit Score",
            Self::MonthlyIncome => "Monthly Income",
            Self::DebtToIncome => "Debt-to-Income Ratio",
            Self::EmploymentDuration => "Employment Duration",
            Self::DigitalFootprint => "Digital Footprint",
        }
    }

    /// Debt ratio passes at or below the requirement; everything else at or above.
    pub const fn higher_is_better(self) -> bool {
        !matches!(self, Self::DebtToIncome)
    }

    pub fn is_satisfied(self, actual: &FactorValue, required: &FactorValue) -> bool {
        match actual.partial_cmp(required) {
            Some(Ordering::Equal) => true,
            Some(Ordering::Greater) => self.higher_is_better(),
            Some(Ordering::Less) => !self.higher_is_better(),
            None => false,
        }
    }
}

/// Measured or required value of a factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Numeric(f64),
    Level(DigitalFootprintLevel),
}

impl FactorValue {
    /// Scalar position used for gap arithmetic; levels map to their rank.
    pub fn magnitude(&self) -> f64 {
        match self {
            FactorValue::Numeric(value) => *value,
            FactorValue::Level(level) => level.rank() as f64,
        }
    }
}

impl PartialOrd for FactorValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (FactorValue::Numeric(left), FactorValue::Numeric(right)) => left.partial_cmp(right),
            (FactorValue::Level(left), FactorValue::Level(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }
}

impl fmt::Display for FactorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorValue::Numeric(value) if value.fract() == 0.0 => write!(f, "{value:.0}"),
            FactorValue::Numeric(value) => write!(f, "{value:.2}"),
            FactorValue::Level(level) => f.write_str(level.label()),
        }
    }
}

/// One criterion of a decision, compared against its requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionFactor {
    pub kind: FactorKind,
    pub name: String,
    pub actual_value: FactorValue,
    pub required_value: FactorValue,
    pub passed: bool,
}

impl DecisionFactor {
    /// Build a factor with `passed` derived from the kind's comparison direction.
    pub fn evaluate(
        kind: FactorKind,
        actual_value: FactorValue,
        required_value: FactorValue,
    ) -> Self {
        Self {
            kind,
            name: kind.label().to_string(),
            passed: kind.is_satisfied(&actual_value, &required_value),
            actual_value,
            required_value,
        }
    }

    /// Absolute distance between actual and required, zero when passing.
    pub fn shortfall(&self) -> f64 {
        if self.passed {
            return 0.0;
        }
        (self.required_value.magnitude() - self.actual_value.magnitude()).abs()
    }
}

/// Numeric actual/required pair; a zero actual means "not evaluated".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorReading {
    #[serde(default)]
    pub actual: f64,
    #[serde(default)]
    pub required: f64,
}

impl FactorReading {
    pub fn new(actual: f64, required: f64) -> Self {
        Self { actual, required }
    }

    fn evaluated(&self) -> bool {
        self.actual.is_finite() && self.required.is_finite() && self.actual != 0.0
    }
}

/// Digital footprint pair; a missing actual level means "not evaluated".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintReading {
    #[serde(default)]
    pub actual: Option<DigitalFootprintLevel>,
    pub required: DigitalFootprintLevel,
}

/// A loan decision as recorded by the decision-history source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    #[serde(default)]
    pub decision_id: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub credit_score: FactorReading,
    #[serde(default)]
    pub monthly_income: FactorReading,
    #[serde(default)]
    pub debt_to_income: FactorReading,
    #[serde(default)]
    pub employment_months: FactorReading,
    #[serde(default)]
    pub digital_footprint: Option<FootprintReading>,
}

impl DecisionSnapshot {
    pub fn is_denied(&self) -> bool {
        let outcome = self.outcome.trim().to_ascii_lowercase();
        outcome.starts_with("denied") || outcome.starts_with("rejected") || outcome == "declined"
    }
}

/// Compare every evaluated factor of `decision`. Factors with a zero or empty
/// actual value are left out entirely rather than reported as failures.
pub fn compare_factors(decision: &DecisionSnapshot) -> Vec<DecisionFactor> {
    let numeric = [
        (FactorKind::CreditScore, decision.credit_score),
        (FactorKind::MonthlyIncome, decision.monthly_income),
        (FactorKind::DebtToIncome, decision.debt_to_income),
        (FactorKind::EmploymentDuration, decision.employment_months),
    ];

    let mut factors: Vec<DecisionFactor> = numeric
        .into_iter()
        .filter(|(_, reading)| reading.evaluated())
        .map(|(kind, reading)| {
            DecisionFactor::evaluate(
                kind,
                FactorValue::Numeric(reading.actual),
                FactorValue::Numeric(reading.required),
            )
        })
        .collect();

    if let Some(FootprintReading {
        actual: Some(actual),
        required,
    }) = decision.digital_footprint
    {
        factors.push(DecisionFactor::evaluate(
            FactorKind::DigitalFootprint,
            FactorValue::Level(actual),
            FactorValue::Level(required),
        ));
    }

    factors
}

/// Failing factors, largest relative gap first; equal gaps keep input order.
pub fn rank_failing(factors: &[DecisionFactor]) -> Vec<&DecisionFactor> {
    let mut failing: Vec<(&DecisionFactor, f64)> = factors
        .iter()
        .filter(|factor| !factor.passed)
        .map(|factor| (factor, super::counterfactual::relative_gap(factor)))
        .collect();
    failing.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    failing.into_iter().map(|(factor, _)| factor).collect()
}
