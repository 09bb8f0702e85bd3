//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifact`: loads the serialized pipeline and metrics report from disk
//! - `linear`: JSON-exported classification pipeline (scaler + one-hot
//!   encoder + logistic / MLP / linear-SVC head)

pub mod artifact;
pub mod linear;

pub use artifact::{ArtifactError, MetricsError};
