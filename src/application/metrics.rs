//! Metrics service: once-only lazy loading of the evaluation report.

use std::path::PathBuf;

use once_cell::sync::OnceCell;

use crate::adapters::artifact::load_metrics;
use crate::adapters::MetricsError;
use crate::domain::MetricsReport;

/// Lazily-initialized, immutable holder for the metrics report.
///
/// The artifact is read on first access only; the outcome (report or
/// unavailability) is cached for the process lifetime and never reloaded.
pub struct MetricsService {
    path: PathBuf,
    cache: OnceCell<Result<MetricsReport, MetricsError>>,
}

impl MetricsService {
    /// Create a service reading from the given artifact path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceCell::new(),
        }
    }

    /// Get the cached report, loading it on first call.
    ///
    /// # Errors
    /// Returns the cached `MetricsError` when the artifact was missing or
    /// malformed at first access. Callers degrade to an "unavailable"
    /// notice; prediction is unaffected.
    pub fn report(&self) -> Result<&MetricsReport, &MetricsError> {
        self.cache
            .get_or_init(|| {
                let result = load_metrics(&self.path);
                if let Err(e) = &result {
                    tracing::warn!("Metrics unavailable: {e}");
                }
                result
            })
            .as_ref()
    }
}
