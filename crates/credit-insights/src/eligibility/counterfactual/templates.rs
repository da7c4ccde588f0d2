use super::{Difficulty, Timeframe};
use crate::eligibility::decision::FactorKind;

/// Static guidance attached to every scenario of a factor kind.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScenarioTemplate {
    pub difficulty: Difficulty,
    pub timeframe: Timeframe,
    pub cost_estimate: &'static str,
    pub action_steps: &'static [&'static str],
}

pub(crate) fn template_for(kind: FactorKind) -> ScenarioTemplate {
    match kind {
        FactorKind::CreditScore => ScenarioTemplate {
            difficulty: Difficulty::Medium,
            timeframe: Timeframe::months(3, 6),
            cost_estimate: "No direct cost; requires consistent on-time repayments",
            action_steps: &[
                "Pay down revolving balances below 30% of the credit limit",
                "Dispute any errors on your credit report",
                "Keep every EMI and card payment on time",
                "Avoid new hard credit enquiries until the score recovers",
            ],
        },
        FactorKind::MonthlyIncome => ScenarioTemplate {
            difficulty: Difficulty::Hard,
            timeframe: Timeframe::months(6, 12),
            cost_estimate: "Varies; may involve upskilling or a secondary income source",
            action_steps: &[
                "Document every regular income source, including rent and freelance work",
                "Add a co-applicant with verifiable income",
                "Negotiate a salary revision or take on additional work",
            ],
        },
        FactorKind::DebtToIncome => ScenarioTemplate {
            difficulty: Difficulty::Medium,
            timeframe: Timeframe::months(2, 4),
            cost_estimate: "Requires prepaying part of your outstanding debt",
            action_steps: &[
                "Prepay the highest-interest loan first",
                "Consolidate small loans into a single lower EMI",
                "Close unused credit lines that carry an EMI",
            ],
        },
        FactorKind::EmploymentDuration => ScenarioTemplate {
            difficulty: Difficulty::Easy,
            timeframe: Timeframe::months(3, 12),
            cost_estimate: "No cost; requires staying with your current employer",
            action_steps: &[
                "Continue with your current employer until the tenure requirement is met",
                "Keep salary slips and an employment letter ready for re-application",
            ],
        },
        FactorKind::DigitalFootprint => ScenarioTemplate {
            difficulty: Difficulty::Easy,
            timeframe: Timeframe::months(1, 2),
            cost_estimate: "Free",
            action_steps: &[
                "Route salary and bill payments through your bank account",
                "Use UPI and net banking for routine transactions",
                "Link your account to verified utility and telecom billers",
            ],
        },
    }
}
