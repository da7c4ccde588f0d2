use serde::Serialize;

use super::OfferType;
use crate::eligibility::profile::Profile;

/// Conjunctive threshold check; an unset bound is not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EligibilityRule {
    pub min_credit_score: Option<u16>,
    pub min_monthly_income: Option<f64>,
    /// Applicant must be strictly younger than this.
    pub max_age_exclusive: Option<u8>,
}

impl EligibilityRule {
    pub fn matches(&self, profile: &Profile) -> bool {
        self.shortfalls(profile).is_empty()
    }

    /// Human readable list of the bounds the profile misses.
    pub fn shortfalls(&self, profile: &Profile) -> Vec<String> {
        let mut misses = Vec::new();

        if let Some(min) = self.min_credit_score {
            if profile.credit_score() < min {
                misses.push(format!(
                    "credit score {} below {}",
                    profile.credit_score(),
                    min
                ));
            }
        }

        if let Some(min) = self.min_monthly_income {
            if profile.monthly_income() < min {
                misses.push(format!(
                    "monthly income {:.0} below {:.0}",
                    profile.monthly_income(),
                    min
                ));
            }
        }

        if let Some(limit) = self.max_age_exclusive {
            if profile.age() >= limit {
                misses.push(format!("age {} not under {}", profile.age(), limit));
            }
        }

        misses
    }
}

/// Static product terms paired with the rule that unlocks them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductDefinition {
    pub offer_type: OfferType,
    pub rule: EligibilityRule,
    pub eligible_amount: u64,
    /// Annual percentage rate.
    pub interest_rate: f32,
    pub processing_fee: u64,
    pub cashback_percent: Option<f32>,
    pub reward_points: Option<u32>,
}

impl ProductDefinition {
    pub fn is_eligible(&self, profile: &Profile) -> bool {
        self.rule.matches(profile)
    }
}

// Evaluation order doubles as presentation precedence.
const CATALOG: [ProductDefinition; 4] = [
    ProductDefinition {
        offer_type: OfferType::CreditCard,
        rule: EligibilityRule {
            min_credit_score: Some(680),
            min_monthly_income: None,
            max_age_exclusive: None,
        },
        eligible_amount: 150_000,
        interest_rate: 36.0,
        processing_fee: 499,
        cashback_percent: Some(1.5),
        reward_points: Some(5_000),
    },
    ProductDefinition {
        offer_type: OfferType::CarLoan,
        rule: EligibilityRule {
            min_credit_score: Some(700),
            min_monthly_income: Some(40_000.0),
            max_age_exclusive: None,
        },
        eligible_amount: 800_000,
        interest_rate: 8.75,
        processing_fee: 2_500,
        cashback_percent: None,
        reward_points: None,
    },
    ProductDefinition {
        offer_type: OfferType::HomeLoan,
        rule: EligibilityRule {
            min_credit_score: Some(750),
            min_monthly_income: Some(50_000.0),
            max_age_exclusive: Some(50),
        },
        eligible_amount: 5_000_000,
        interest_rate: 8.4,
        processing_fee: 10_000,
        cashback_percent: None,
        reward_points: None,
    },
    ProductDefinition {
        offer_type: OfferType::PersonalLoan,
        rule: EligibilityRule {
            min_credit_score: Some(700),
            min_monthly_income: Some(30_000.0),
            max_age_exclusive: None,
        },
        eligible_amount: 500_000,
        interest_rate: 10.99,
        processing_fee: 1_999,
        cashback_percent: None,
        reward_points: None,
    },
];

/// The rule table in evaluation order.
pub fn product_catalog() -> &'static [ProductDefinition] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::profile::ProfileInput;

    fn profile(credit_score: i64, monthly_income: f64, age: i64) -> Profile {
        Profile::from_input(ProfileInput {
            credit_score: Some(credit_score),
            monthly_income: Some(monthly_income),
            debt_to_income_ratio: Some(0.3),
            employment_months: Some(24),
            age: Some(age),
            ..ProfileInput::default()
        })
        .expect("valid profile")
    }

    #[test]
    fn catalog_follows_precedence_order() {
        let order: Vec<OfferType> = product_catalog().iter().map(|p| p.offer_type).collect();
        assert_eq!(
            order,
            vec![
                OfferType::CreditCard,
                OfferType::CarLoan,
                OfferType::HomeLoan,
                OfferType::PersonalLoan
            ]
        );
    }

    #[test]
    fn thresholds_are_inclusive_for_minimums() {
        let card = &product_catalog()[0];
        assert!(card.is_eligible(&profile(680, 0.0, 30)));
        assert!(!card.is_eligible(&profile(679, 1_000_000.0, 30)));
    }

    #[test]
    fn home_loan_age_limit_is_exclusive() {
        let home = &product_catalog()[2];
        assert!(home.is_eligible(&profile(780, 60_000.0, 49)));
        let over = profile(780, 60_000.0, 50);
        assert!(!home.is_eligible(&over));
        assert_eq!(home.rule.shortfalls(&over), vec!["age 50 not under 50"]);
    }

    #[test]
    fn shortfalls_list_every_missed_bound() {
        let car = &product_catalog()[1];
        let misses = car.rule.shortfalls(&profile(650, 20_000.0, 30));
        assert_eq!(misses.len(), 2);
        assert!(misses[0].contains("credit score 650"));
        assert!(misses[1].contains("monthly income 20000"));
    }
}
