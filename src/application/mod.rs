//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod metrics;
mod prediction;

pub use metrics::MetricsService;
pub use prediction::PredictionService;
