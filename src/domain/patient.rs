//! Patient data types for cardiovascular risk prediction.
//!
//! Field set matches the training dataset of the exported pipeline
//! (cardio study: age, anthropometrics, blood pressure, lifestyle).

use serde::{Deserialize, Serialize};

/// Cholesterol level as recorded in the training dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CholesterolLevel {
    Normal,
    Medium,
    High,
}

impl CholesterolLevel {
    /// Dataset label string the pipeline's encoder was fit on.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Medium => "Medio",
            Self::High => "Alto",
        }
    }

    /// All levels in form display order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Medium, Self::High];
}

/// Glucose level as recorded in the training dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlucoseLevel {
    Normal,
    Elevated,
    VeryElevated,
}

impl GlucoseLevel {
    /// Dataset label string the pipeline's encoder was fit on.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Elevated => "Elevada",
            Self::VeryElevated => "Muy Elevada",
        }
    }

    /// All levels in form display order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Elevated, Self::VeryElevated];
}

/// Raw patient input from the form.
///
/// Ranges are enforced by the input widgets before a `PatientInput` is
/// constructed; downstream code does not re-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    /// Age in years (18-100)
    pub age_years: u32,

    /// Height in centimeters (120-220)
    pub height_cm: u32,

    /// Weight in kilograms (40-200)
    pub weight_kg: f64,

    /// Systolic blood pressure in mmHg (80-250)
    pub systolic: u32,

    /// Diastolic blood pressure in mmHg (50-200)
    pub diastolic: u32,

    pub cholesterol: CholesterolLevel,

    pub glucose: GlucoseLevel,

    pub smokes: bool,

    pub drinks_alcohol: bool,

    pub physically_active: bool,
}

impl PatientInput {
    /// Validate that all fields are within the form's expected ranges.
    ///
    /// # Errors
    /// Returns all violations as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(18..=100).contains(&self.age_years) {
            errors.push(format!("Age {} out of range [18, 100]", self.age_years));
        }
        if !(120..=220).contains(&self.height_cm) {
            errors.push(format!(
                "Height {} out of range [120, 220]",
                self.height_cm
            ));
        }
        if !(40.0..=200.0).contains(&self.weight_kg) {
            errors.push(format!("Weight {} out of range [40, 200]", self.weight_kg));
        }
        if !(80..=250).contains(&self.systolic) {
            errors.push(format!(
                "Systolic BP {} out of range [80, 250]",
                self.systolic
            ));
        }
        if !(50..=200).contains(&self.diastolic) {
            errors.push(format!(
                "Diastolic BP {} out of range [50, 200]",
                self.diastolic
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Dataset label for the smoking field.
    #[must_use]
    pub fn smoke_label(&self) -> &'static str {
        if self.smokes {
            "Fuma"
        } else {
            "No fuma"
        }
    }

    /// Dataset label for the alcohol field.
    #[must_use]
    pub fn alcohol_label(&self) -> &'static str {
        if self.drinks_alcohol {
            "Consume alcohol"
        } else {
            "No consume alcohol"
        }
    }

    /// Dataset label for the physical activity field.
    #[must_use]
    pub fn activity_label(&self) -> &'static str {
        if self.physically_active {
            "Activo"
        } else {
            "Inactivo"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typical_patient() -> PatientInput {
        PatientInput {
            age_years: 50,
            height_cm: 165,
            weight_kg: 70.0,
            systolic: 120,
            diastolic: 80,
            cholesterol: CholesterolLevel::Normal,
            glucose: GlucoseLevel::Normal,
            smokes: false,
            drinks_alcohol: false,
            physically_active: true,
        }
    }

    #[test]
    fn test_valid_patient() {
        assert!(typical_patient().validate().is_ok());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let invalid = PatientInput {
            age_years: 10,
            systolic: 300,
            ..typical_patient()
        };
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_dataset_labels() {
        let patient = typical_patient();
        assert_eq!(patient.cholesterol.label(), "Normal");
        assert_eq!(patient.glucose.label(), "Normal");
        assert_eq!(patient.smoke_label(), "No fuma");
        assert_eq!(patient.alcohol_label(), "No consume alcohol");
        assert_eq!(patient.activity_label(), "Activo");

        let drinker = PatientInput {
            smokes: true,
            drinks_alcohol: true,
            physically_active: false,
            cholesterol: CholesterolLevel::High,
            glucose: GlucoseLevel::VeryElevated,
            ..typical_patient()
        };
        assert_eq!(drinker.cholesterol.label(), "Alto");
        assert_eq!(drinker.glucose.label(), "Muy Elevada");
        assert_eq!(drinker.smoke_label(), "Fuma");
        assert_eq!(drinker.alcohol_label(), "Consume alcohol");
        assert_eq!(drinker.activity_label(), "Inactivo");
    }
}
