//! Patient record schema, validation, and derived fields.
//!
//! A stored record holds the six client-supplied attributes; `bmi` and
//! `verdict` are recomputed from the current `height`/`weight` on every access
//! and are never persisted as independent state. Partial updates carry an
//! `Option` per field so that an omitted field is distinguishable from any
//! supplied value and leaves the stored value untouched.

use crate::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Patient gender, restricted to the two values the registry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Weight-category verdict derived from BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Verdict {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl Verdict {
    /// Buckets a BMI value into its verdict.
    ///
    /// Thresholds follow the registry's documented chain: below 18.5 is
    /// underweight, below 24.9 normal, below 29.9 overweight, anything else
    /// obese.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Verdict::Underweight
        } else if bmi < 24.9 {
            Verdict::NormalWeight
        } else if bmi < 29.9 {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Verdict::Underweight => "Underweight",
            Verdict::NormalWeight => "Normal weight",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        };
        write!(f, "{label}")
    }
}

/// Body-mass index from height in metres and weight in kilograms, rounded to
/// two decimal places.
///
/// Pure function over `(height, weight)`; callers are expected to have
/// validated `height > 0` first.
pub fn bmi(height: f64, weight: f64) -> f64 {
    (weight / (height * height) * 100.0).round() / 100.0
}

/// A patient record as persisted in the registry file.
///
/// The patient id is the collection key, not a field, and the derived fields
/// live only in [`PatientView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    /// Height in metres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
}

impl PatientRecord {
    /// Validates the record's field constraints.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidInput` if `name` or `city` is empty or
    /// whitespace-only, if `height` is not a finite value greater than zero,
    /// or if `weight` is not a finite value of at least zero.
    pub fn validate(&self) -> RegistryResult<()> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidInput("name cannot be empty".into()));
        }

        if self.city.trim().is_empty() {
            return Err(RegistryError::InvalidInput("city cannot be empty".into()));
        }

        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(RegistryError::InvalidInput(
                "height must be greater than zero metres".into(),
            ));
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(RegistryError::InvalidInput(
                "weight cannot be negative".into(),
            ));
        }

        Ok(())
    }

    /// Applies a partial update in place and re-validates the merged record.
    ///
    /// Only fields present in `update` overwrite the stored values; a merged
    /// record that violates a constraint fails exactly like a create, and the
    /// record is left unmodified in that case.
    pub fn apply(&mut self, update: PatientUpdate) -> RegistryResult<()> {
        let mut merged = self.clone();

        if let Some(name) = update.name {
            merged.name = name;
        }
        if let Some(city) = update.city {
            merged.city = city;
        }
        if let Some(age) = update.age {
            merged.age = age;
        }
        if let Some(gender) = update.gender {
            merged.gender = gender;
        }
        if let Some(height) = update.height {
            merged.height = height;
        }
        if let Some(weight) = update.weight {
            merged.weight = weight;
        }

        merged.validate()?;
        *self = merged;

        Ok(())
    }
}

/// A patient record as returned to clients, with the derived fields attached.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PatientView {
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub verdict: Verdict,
}

impl From<&PatientRecord> for PatientView {
    fn from(record: &PatientRecord) -> Self {
        let bmi = bmi(record.height, record.weight);

        Self {
            name: record.name.clone(),
            city: record.city.clone(),
            age: record.age,
            gender: record.gender,
            height: record.height,
            weight: record.weight,
            bmi,
            verdict: Verdict::from_bmi(bmi),
        }
    }
}

/// A partial update to a stored record.
///
/// Every field defaults to `None` when absent from the request body, so the
/// caller controls exactly which attributes are overwritten.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatientUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatientRecord {
        PatientRecord {
            name: "Ananya".into(),
            city: "Guwahati".into(),
            age: 28,
            gender: Gender::Female,
            height: 1.65,
            weight: 90.0,
        }
    }

    #[test]
    fn test_bmi_rounds_to_two_decimals() {
        assert_eq!(bmi(1.65, 90.0), 33.06);
        assert_eq!(bmi(1.72, 85.0), 28.73);
        assert_eq!(bmi(2.0, 80.0), 20.0);
    }

    #[test]
    fn test_verdict_thresholds_at_boundaries() {
        // height 1.0 makes bmi equal the weight
        assert_eq!(Verdict::from_bmi(bmi(1.0, 18.49)), Verdict::Underweight);
        assert_eq!(Verdict::from_bmi(bmi(1.0, 18.5)), Verdict::NormalWeight);
        assert_eq!(Verdict::from_bmi(bmi(1.0, 24.89)), Verdict::NormalWeight);
        assert_eq!(Verdict::from_bmi(bmi(1.0, 24.9)), Verdict::Overweight);
        assert_eq!(Verdict::from_bmi(bmi(1.0, 29.89)), Verdict::Overweight);
        assert_eq!(Verdict::from_bmi(bmi(1.0, 29.9)), Verdict::Obese);
        assert_eq!(Verdict::from_bmi(bmi(1.0, 120.0)), Verdict::Obese);
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::NormalWeight.to_string(), "Normal weight");
        assert_eq!(
            serde_json::to_value(Verdict::NormalWeight).unwrap(),
            serde_json::json!("Normal weight")
        );
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut blank_name = sample();
        blank_name.name = "   ".into();
        assert!(matches!(
            blank_name.validate(),
            Err(RegistryError::InvalidInput(_))
        ));

        let mut zero_height = sample();
        zero_height.height = 0.0;
        assert!(matches!(
            zero_height.validate(),
            Err(RegistryError::InvalidInput(_))
        ));

        let mut negative_weight = sample();
        negative_weight.weight = -1.0;
        assert!(matches!(
            negative_weight.validate(),
            Err(RegistryError::InvalidInput(_))
        ));

        let mut nan_height = sample();
        nan_height.height = f64::NAN;
        assert!(matches!(
            nan_height.validate(),
            Err(RegistryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_apply_overwrites_only_present_fields() {
        let mut record = sample();
        let update = PatientUpdate {
            city: Some("Mumbai".into()),
            weight: Some(75.0),
            ..Default::default()
        };

        record.apply(update).unwrap();

        assert_eq!(record.city, "Mumbai");
        assert_eq!(record.weight, 75.0);
        // untouched fields survive the merge
        assert_eq!(record.name, "Ananya");
        assert_eq!(record.age, 28);
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.height, 1.65);
    }

    #[test]
    fn test_apply_recomputes_derived_fields() {
        let mut record = sample();
        assert_eq!(PatientView::from(&record).verdict, Verdict::Obese);

        record
            .apply(PatientUpdate {
                weight: Some(60.0),
                ..Default::default()
            })
            .unwrap();

        let view = PatientView::from(&record);
        assert_eq!(view.bmi, 22.04);
        assert_eq!(view.verdict, Verdict::NormalWeight);
    }

    #[test]
    fn test_apply_invalid_merge_leaves_record_unchanged() {
        let mut record = sample();
        let before = record.clone();

        let result = record.apply(PatientUpdate {
            height: Some(-1.8),
            ..Default::default()
        });

        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
        assert_eq!(record, before);
    }

    #[test]
    fn test_update_deserializes_absent_fields_as_none() {
        let update: PatientUpdate = serde_json::from_str(r#"{"age": 31}"#).unwrap();
        assert_eq!(update.age, Some(31));
        assert!(update.name.is_none());
        assert!(update.height.is_none());
    }
}
