//! Feature assembly: raw form input into the trained pipeline's row schema.
//!
//! The column set and order here must byte-match what the pipeline's
//! preprocessing step was fit on; a mismatch is a hard inference failure,
//! never a silent default.

use serde::{Deserialize, Serialize};

use super::patient::PatientInput;

/// The dataset stores age in days.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Constant substituted for the `gender` column, which the form does not
/// collect. Preserved from the original artifact's training setup as a
/// documented approximation; do not re-derive.
pub const GENDER_PLACEHOLDER: f64 = 2.0;

/// The exact single-row structure the pipeline consumes.
///
/// Numeric columns carry raw (unscaled) values; categorical columns carry
/// the original dataset label strings. Scaling and encoding belong to the
/// pipeline's internal preprocessing, not to this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Age in days (`age` column)
    pub age_days: f64,
    /// Demographic placeholder (`gender` column)
    pub gender: f64,
    /// Height in cm (`height` column)
    pub height: f64,
    /// Weight in kg (`weight` column)
    pub weight: f64,
    /// Systolic BP (`ap_hi` column)
    pub ap_hi: f64,
    /// Diastolic BP (`ap_lo` column)
    pub ap_lo: f64,
    /// Cholesterol label (`cholesterol` column)
    pub cholesterol: String,
    /// Glucose label (`gluc` column)
    pub gluc: String,
    /// Smoking label (`smoke` column)
    pub smoke: String,
    /// Alcohol label (`alco` column)
    pub alco: String,
    /// Activity label (`active` column)
    pub active: String,
    /// Derived: age in years (`age_years` column)
    pub age_years: f64,
    /// Derived: body-mass index (`imc` column)
    pub imc: f64,
}

impl FeatureRecord {
    /// Column names in training order. The pipeline artifact's
    /// `feature_names` must equal this set exactly.
    pub const COLUMNS: [&'static str; 13] = [
        "age",
        "gender",
        "height",
        "weight",
        "ap_hi",
        "ap_lo",
        "cholesterol",
        "gluc",
        "smoke",
        "alco",
        "active",
        "age_years",
        "imc",
    ];

    /// Look up a numeric column by name. Returns `None` for categorical
    /// or unknown columns.
    #[must_use]
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "age" => Some(self.age_days),
            "gender" => Some(self.gender),
            "height" => Some(self.height),
            "weight" => Some(self.weight),
            "ap_hi" => Some(self.ap_hi),
            "ap_lo" => Some(self.ap_lo),
            "age_years" => Some(self.age_years),
            "imc" => Some(self.imc),
            _ => None,
        }
    }

    /// Look up a categorical column by name. Returns `None` for numeric
    /// or unknown columns.
    #[must_use]
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "cholesterol" => Some(&self.cholesterol),
            "gluc" => Some(&self.gluc),
            "smoke" => Some(&self.smoke),
            "alco" => Some(&self.alco),
            "active" => Some(&self.active),
            _ => None,
        }
    }
}

/// Map a `PatientInput` into the record schema the pipeline expects.
///
/// Pure and deterministic: the same input always yields the same record.
///
/// - `age` is converted to days (`age_years * 365`).
/// - BMI is `weight / (height/100)^2`, full float precision.
/// - Categorical fields pass through as their dataset label strings.
/// - `gender` is filled with [`GENDER_PLACEHOLDER`].
#[must_use]
pub fn assemble(input: &PatientInput) -> FeatureRecord {
    let age_days = f64::from(input.age_years) * DAYS_PER_YEAR;
    let height_m = f64::from(input.height_cm) / 100.0;

    FeatureRecord {
        age_days,
        gender: GENDER_PLACEHOLDER,
        height: f64::from(input.height_cm),
        weight: input.weight_kg,
        ap_hi: f64::from(input.systolic),
        ap_lo: f64::from(input.diastolic),
        cholesterol: input.cholesterol.label().to_string(),
        gluc: input.glucose.label().to_string(),
        smoke: input.smoke_label().to_string(),
        alco: input.alcohol_label().to_string(),
        active: input.activity_label().to_string(),
        age_years: age_days / DAYS_PER_YEAR,
        imc: input.weight_kg / (height_m * height_m),
    }
}
