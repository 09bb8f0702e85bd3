//! Prediction service: the form-to-model request pipeline.
//!
//! One synchronous pass per user interaction:
//! assemble features, invoke the pipeline, interpret the probability.

use std::sync::Arc;

use crate::domain::{assemble, PatientInput, Prediction, RiskLabel};
use crate::ports::{Pipeline, PipelineError};
use crate::Error;

/// Service for running a prediction against the loaded pipeline.
///
/// The pipeline is a process-wide, read-only resource loaded once at
/// startup; the service only borrows it through `Arc`.
pub struct PredictionService<P>
where
    P: Pipeline,
{
    pipeline: Arc<P>,
}

impl<P> PredictionService<P>
where
    P: Pipeline,
{
    /// Create a new prediction service.
    pub fn new(pipeline: Arc<P>) -> Self {
        Self { pipeline }
    }

    /// Run the full prediction pass for one patient.
    ///
    /// 1. Assemble the single-row feature record
    /// 2. Predict the class label (element 0 of the batch result)
    /// 3. Attach P(class 1) when the model supports it
    /// 4. Derive the risk tier only when a probability is present
    ///
    /// Patient field values are never logged, only outcomes.
    ///
    /// # Errors
    /// Returns `Error::Inference` if the pipeline rejects the record or
    /// prediction fails. The caller surfaces it inline and keeps running.
    pub fn run(&self, input: &PatientInput) -> Result<Prediction, Error> {
        let record = assemble(input);
        let rows = std::slice::from_ref(&record);

        let labels = self.pipeline.predict(rows)?;
        let label: RiskLabel = labels
            .first()
            .copied()
            .ok_or_else(|| PipelineError::Prediction("empty prediction batch".to_string()))?;

        let probability = self
            .pipeline
            .predict_probability(rows)?
            .and_then(|probabilities| probabilities.first().copied());

        let prediction = Prediction::new(label, probability);

        match (prediction.probability, prediction.tier) {
            (Some(p), Some(tier)) => {
                tracing::info!("Prediction complete: label={label}, probability={p:.2}, tier={tier}");
            }
            _ => {
                tracing::info!("Prediction complete: label={label} (no probability estimator)");
            }
        }

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CholesterolLevel, FeatureRecord, GlucoseLevel, RiskTier};

    /// Stub pipeline with a fixed outcome.
    struct StubPipeline {
        label: RiskLabel,
        probability: Option<f64>,
    }

    impl Pipeline for StubPipeline {
        fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<RiskLabel>, PipelineError> {
            Ok(vec![self.label; rows.len()])
        }

        fn predict_probability(
            &self,
            rows: &[FeatureRecord],
        ) -> Result<Option<Vec<f64>>, PipelineError> {
            Ok(self.probability.map(|p| vec![p; rows.len()]))
        }
    }

    /// Stub pipeline that always rejects the record.
    struct FailingPipeline;

    impl Pipeline for FailingPipeline {
        fn predict(&self, _rows: &[FeatureRecord]) -> Result<Vec<RiskLabel>, PipelineError> {
            Err(PipelineError::Prediction("stub failure".to_string()))
        }

        fn predict_probability(
            &self,
            _rows: &[FeatureRecord],
        ) -> Result<Option<Vec<f64>>, PipelineError> {
            Err(PipelineError::Prediction("stub failure".to_string()))
        }
    }

    fn reference_input() -> PatientInput {
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
    fn test_not_at_risk_scenario() {
        let service = PredictionService::new(Arc::new(StubPipeline {
            label: RiskLabel::NotAtRisk,
            probability: Some(0.10),
        }));

        let prediction = service.run(&reference_input()).expect("Should predict");
        assert_eq!(prediction.label.to_string(), "Sin riesgo");
        assert_eq!(prediction.probability, Some(0.10));
        assert_eq!(prediction.tier, Some(RiskTier::VeryLow));
    }

    #[test]
    fn test_at_risk_scenario() {
        let service = PredictionService::new(Arc::new(StubPipeline {
            label: RiskLabel::AtRisk,
            probability: Some(0.82),
        }));

        let prediction = service.run(&reference_input()).expect("Should predict");
        assert_eq!(prediction.label.to_string(), "Con riesgo");
        assert_eq!(prediction.probability, Some(0.82));
        assert_eq!(prediction.tier, Some(RiskTier::High));
    }

    #[test]
    fn test_missing_probability_skips_interpreter() {
        let service = PredictionService::new(Arc::new(StubPipeline {
            label: RiskLabel::AtRisk,
            probability: None,
        }));

        let prediction = service.run(&reference_input()).expect("Should predict");
        assert_eq!(prediction.label, RiskLabel::AtRisk);
        assert!(prediction.probability.is_none());
        assert!(prediction.tier.is_none());
    }

    #[test]
    fn test_pipeline_failure_is_recoverable_inference_error() {
        let service = PredictionService::new(Arc::new(FailingPipeline));

        let err = service.run(&reference_input()).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(err.to_string().contains("stub failure"));
    }
}
