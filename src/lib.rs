//! # CardioRisk
//!
//! Cardiovascular risk prediction from patient health metrics using a
//! pre-trained binary classifier.
//!
//! This crate provides:
//! - Feature assembly from raw form input into the trained pipeline's schema
//! - Inference against a JSON-exported classification pipeline
//! - A four-tier risk interpretation of the predicted probability
//! - Terminal UI for local-only use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (PatientInput, FeatureRecord, Prediction, MetricsReport)
//! - `ports`: Trait definition for the opaque classification pipeline
//! - `adapters`: Concrete implementations (artifact loading, linear/MLP pipeline)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{PatientInput, Prediction, RiskLabel, RiskTier};

/// Result type for CardioRisk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CardioRisk
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fatal: the model artifact is missing or unreadable. The application
    /// must not offer prediction without a model.
    #[error("Model artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    /// Recoverable: the metrics artifact is missing or malformed. Only the
    /// metrics view degrades; prediction is unaffected.
    #[error("Metrics unavailable: {0}")]
    Metrics(#[from] adapters::MetricsError),

    /// Recoverable: a prediction attempt failed. Shown inline with the
    /// cause; the session keeps running.
    #[error("Inference failed: {0}")]
    Inference(#[from] ports::PipelineError),

    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
