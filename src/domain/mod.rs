//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. All types are
//! serializable and the feature assembly is a pure function.

mod features;
mod metrics;
mod patient;
mod prediction;

pub use features::{assemble, FeatureRecord, DAYS_PER_YEAR, GENDER_PLACEHOLDER};
pub use metrics::MetricsReport;
pub use patient::{CholesterolLevel, GlucoseLevel, PatientInput};
pub use prediction::{Prediction, RiskLabel, RiskTier};
