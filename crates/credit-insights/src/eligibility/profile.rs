use std::fmt;

use serde::{Deserialize, Serialize};

/// Breadth of a customer's digital banking activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitalFootprintLevel {
    Low,
    Medium,
    High,
}

impl DigitalFootprintLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Position on the low..high scale, used for gap arithmetic.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl fmt::Display for DigitalFootprintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Urban,
    #[serde(alias = "semi-urban")]
    SemiUrban,
    Rural,
}

impl LocationType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::SemiUrban => "Semi-urban",
            Self::Rural => "Rural",
        }
    }
}

pub const MIN_CREDIT_SCORE: i64 = 300;
pub const MAX_CREDIT_SCORE: i64 = 900;
const MAX_AGE: i64 = 120;

/// Raw profile fields as read from the settings store. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub credit_score: Option<i64>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub debt_to_income_ratio: Option<f64>,
    #[serde(default)]
    pub employment_months: Option<i64>,
    #[serde(default)]
    pub digital_footprint: Option<DigitalFootprintLevel>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub location: Option<LocationType>,
}

/// Validation failures raised while building a [`Profile`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile field `{field}` is required")]
    MissingField { field: &'static str },
    #[error("profile field `{field}` must be non-negative (found {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("profile field `{field}` must be within [{min}, {max}] (found {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("profile field `{field}` must be a finite number")]
    NotFinite { field: &'static str },
}

/// Validated, immutable snapshot of a customer's financial attributes.
///
/// The only way to obtain one is through [`Profile::from_input`] (or
/// deserialization, which runs the same checks), so every accessor can be
/// trusted to hold an in-range value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileInput")]
pub struct Profile {
    credit_score: u16,
    monthly_income: f64,
    debt_to_income_ratio: f64,
    employment_months: u32,
    digital_footprint: DigitalFootprintLevel,
    age: u8,
    location: LocationType,
}

impl Profile {
    pub fn from_input(input: ProfileInput) -> Result<Self, ProfileError> {
        let credit_score = required("credit_score", input.credit_score)?;
        let credit_score = non_negative_int("credit_score", credit_score)?;
        let credit_score = within(
            "credit_score",
            credit_score,
            MIN_CREDIT_SCORE,
            MAX_CREDIT_SCORE,
        )? as u16;

        let monthly_income = required("monthly_income", input.monthly_income)?;
        let monthly_income = non_negative_float("monthly_income", monthly_income)?;

        let debt_to_income_ratio = required("debt_to_income_ratio", input.debt_to_income_ratio)?;
        let debt_to_income_ratio =
            non_negative_float("debt_to_income_ratio", debt_to_income_ratio)?;
        if debt_to_income_ratio > 1.0 {
            return Err(ProfileError::OutOfRange {
                field: "debt_to_income_ratio",
                value: debt_to_income_ratio,
                min: 0.0,
                max: 1.0,
            });
        }

        let employment_months = required("employment_months", input.employment_months)?;
        let employment_months = non_negative_int("employment_months", employment_months)?;
        let employment_months =
            within("employment_months", employment_months, 0, u32::MAX as i64)? as u32;

        let age = required("age", input.age)?;
        let age = non_negative_int("age", age)?;
        let age = within("age", age, 0, MAX_AGE)? as u8;

        Ok(Self {
            credit_score,
            monthly_income,
            debt_to_income_ratio,
            employment_months,
            digital_footprint: input.digital_footprint.unwrap_or(DigitalFootprintLevel::Low),
            age,
            location: input.location.unwrap_or(LocationType::Urban),
        })
    }

    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn debt_to_income_ratio(&self) -> f64 {
        self.debt_to_income_ratio
    }

    pub fn employment_months(&self) -> u32 {
        self.employment_months
    }

    pub fn digital_footprint(&self) -> DigitalFootprintLevel {
        self.digital_footprint
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn location(&self) -> LocationType {
        self.location
    }
}

impl TryFrom<ProfileInput> for Profile {
    type Error = ProfileError;

    fn try_from(value: ProfileInput) -> Result<Self, Self::Error> {
        Self::from_input(value)
    }
}

impl From<&Profile> for ProfileInput {
    fn from(profile: &Profile) -> Self {
        Self {
            credit_score: Some(profile.credit_score as i64),
            monthly_income: Some(profile.monthly_income),
            debt_to_income_ratio: Some(profile.debt_to_income_ratio),
            employment_months: Some(profile.employment_months as i64),
            digital_footprint: Some(profile.digital_footprint),
            age: Some(profile.age as i64),
            location: Some(profile.location),
        }
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ProfileError> {
    value.ok_or(ProfileError::MissingField { field })
}

fn non_negative_int(field: &'static str, value: i64) -> Result<i64, ProfileError> {
    if value < 0 {
        return Err(ProfileError::Negative {
            field,
            value: value as f64,
        });
    }
    Ok(value)
}

fn non_negative_float(field: &'static str, value: f64) -> Result<f64, ProfileError> {
    if !value.is_finite() {
        return Err(ProfileError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ProfileError::Negative { field, value });
    }
    Ok(value)
}

fn within(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, ProfileError> {
    if value < min || value > max {
        return Err(ProfileError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(value)
}
