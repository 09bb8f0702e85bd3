//! Artifact loading: trained pipeline and evaluation metrics from disk.
//!
//! The pipeline artifact is load-once-per-process and required: a missing
//! or malformed file refuses startup. The metrics artifact is optional;
//! failures degrade the metrics view only.

use std::path::{Path, PathBuf};

use crate::adapters::linear::{ExportedPipeline, LinearPipeline};
use crate::domain::MetricsReport;

/// Default relative path of the pipeline artifact.
pub const DEFAULT_MODEL_PATH: &str = "artifacts/v1/pipeline.json";

/// Default relative path of the metrics artifact.
pub const DEFAULT_METRICS_PATH: &str = "artifacts/v1/metrics.json";

/// Fatal errors loading the model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read model artifact at {path:?}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("malformed model artifact at {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Recoverable errors loading the metrics artifact.
///
/// `Clone` so the once-only outcome can be cached for the process lifetime.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetricsError {
    #[error("metrics artifact not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("malformed metrics artifact at {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Load the trained classification pipeline from a JSON export.
///
/// # Errors
/// Returns `ArtifactError::NotFound` if the file is missing, `Io` if it
/// cannot be read, and `Malformed` if parsing or internal consistency
/// checks fail. All of these are fatal to the caller.
pub fn load_pipeline(path: &Path) -> Result<LinearPipeline, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let export: ExportedPipeline =
        serde_json::from_str(&content).map_err(|e| ArtifactError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let pipeline = LinearPipeline::from_export(export).map_err(|reason| {
        ArtifactError::Malformed {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    tracing::info!(
        "Loaded pipeline from {:?} (head={}, n_features={}, probability={})",
        path,
        pipeline.head_kind(),
        pipeline.feature_names().len(),
        pipeline.supports_probability()
    );

    Ok(pipeline)
}

/// Load the evaluation metrics report.
///
/// # Errors
/// Returns `MetricsError` if the file is missing or malformed. Callers
/// degrade gracefully by omitting the metrics view.
pub fn load_metrics(path: &Path) -> Result<MetricsReport, MetricsError> {
    if !path.exists() {
        return Err(MetricsError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read(path).map_err(|e| MetricsError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let report: MetricsReport =
        serde_json::from_slice(&content).map_err(|e| MetricsError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::info!(
        "Loaded metrics from {:?} ({} test samples, {} named metrics)",
        path,
        report.total_samples(),
        report.test_metrics.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::linear::test_support::sample_export_json;

    #[test]
    fn test_missing_pipeline_is_not_found() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let path = dir.path().join("pipeline.json");

        let err = load_pipeline(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_pipeline() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, "{ not json").expect("Should write");

        let err = load_pipeline(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn test_load_valid_pipeline() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, sample_export_json()).expect("Should write");

        let pipeline = load_pipeline(&path).expect("Should load");
        assert_eq!(pipeline.feature_names().len(), 13);
    }

    #[test]
    fn test_missing_metrics_is_not_found() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let path = dir.path().join("metrics.json");

        let err = load_metrics(&path).unwrap_err();
        assert!(matches!(err, MetricsError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_metrics() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, r#"{"confusion_matrix": [[1, 2]]}"#).expect("Should write");

        let err = load_metrics(&path).unwrap_err();
        assert!(matches!(err, MetricsError::Malformed { .. }));
    }

    #[test]
    fn test_load_valid_metrics() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let path = dir.path().join("metrics.json");
        std::fs::write(
            &path,
            r#"{
                "confusion_matrix": [[5874, 1122], [1634, 5370]],
                "test_metrics": {"accuracy": 0.803, "recall": 0.767}
            }"#,
        )
        .expect("Should write");

        let report = load_metrics(&path).expect("Should load");
        assert_eq!(report.confusion_matrix[1][1], 5370);
        assert!((report.test_metrics["recall"] - 0.767).abs() < f64::EPSILON);
    }
}
