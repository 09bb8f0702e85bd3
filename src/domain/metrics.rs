//! Static model-evaluation report loaded alongside the pipeline artifact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Held-out evaluation metrics for the trained pipeline.
///
/// Read once from a fixed artifact path at first use of the metrics view
/// and immutable thereafter. Not regenerated by this application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// 2x2 matrix, rows = actual class, columns = predicted class
    pub confusion_matrix: [[u64; 2]; 2],

    /// Named scalar metrics (accuracy, precision, recall, f1, roc_auc, ...)
    pub test_metrics: BTreeMap<String, f64>,
}

impl MetricsReport {
    /// Total number of test samples in the confusion matrix.
    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.confusion_matrix.iter().flatten().sum()
    }
}
