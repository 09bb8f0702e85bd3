//! Pipeline port: Trait for the opaque trained classification pipeline.
//!
//! The pipeline bundles the model and its internal preprocessing steps
//! (scaling, categorical encoding). Callers hand it raw `FeatureRecord`s
//! and never encode features themselves.

use crate::domain::{FeatureRecord, RiskLabel};

/// Errors raised by a pipeline during inference.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    /// The record's column set does not match what the pipeline was fit on.
    #[error("feature schema mismatch: expected columns [{expected}], got [{got}]")]
    SchemaMismatch { expected: String, got: String },

    /// A categorical value was not in the encoder's fitted vocabulary.
    #[error("unknown category {label:?} for column {column:?}")]
    UnknownCategory { column: String, label: String },

    /// Any other failure during prediction.
    #[error("prediction failed: {0}")]
    Prediction(String),
}

/// Trait for the trained classification pipeline.
///
/// Implementations run the full preprocessing + inference chain on raw
/// feature records.
pub trait Pipeline: Send + Sync {
    /// Predict class labels for a batch of records.
    ///
    /// # Errors
    /// Returns `PipelineError` if a record violates the fitted schema or
    /// prediction fails.
    fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<RiskLabel>, PipelineError>;

    /// Predict P(class 1) for a batch of records.
    ///
    /// Returns `Ok(None)` when the underlying model has no probability
    /// estimator. Absence of probability support is an expected outcome,
    /// not an error.
    ///
    /// # Errors
    /// Returns `PipelineError` if a record violates the fitted schema or
    /// prediction fails.
    fn predict_probability(
        &self,
        rows: &[FeatureRecord],
    ) -> Result<Option<Vec<f64>>, PipelineError>;
}
