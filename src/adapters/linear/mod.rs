//! Linear pipeline adapter: JSON-exported classification pipeline.
//!
//! Runs the same preprocessing chain the model was trained with:
//! standard scaling for numeric columns and one-hot encoding for
//! categorical label strings, followed by one of three heads:
//!
//! - `logistic`: logistic regression, probability via sigmoid
//! - `mlp`: ReLU hidden layers with a single sigmoid output unit
//! - `linear_svc`: decision function only, no probability estimator
//!
//! The export format mirrors what the training side writes out; all
//! internal consistency checks happen once at load time, so prediction
//! can only fail on per-record schema violations.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureRecord, RiskLabel};
use crate::ports::{Pipeline, PipelineError};

/// Supported export format version.
const FORMAT_VERSION: u32 = 1;

/// Scaler parameters for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericScaler {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

/// Fitted vocabulary for one categorical column. One-hot slots follow
/// the category order listed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    pub name: String,
    pub categories: Vec<String>,
}

/// Preprocessing parameters fit at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedPreprocess {
    pub numeric: Vec<NumericScaler>,
    pub categorical: Vec<CategoricalEncoder>,
}

/// One dense layer of an exported MLP. `weights[i]` is the input weight
/// row of output unit `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

/// Classifier head of the exported pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedHead {
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    LinearSvc {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    Mlp {
        layers: Vec<ExportedLayer>,
    },
}

/// Pipeline parameters exported by the training side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedPipeline {
    pub format_version: u32,
    /// Column names in training order; must match `FeatureRecord::COLUMNS`.
    pub feature_names: Vec<String>,
    pub preprocess: ExportedPreprocess,
    pub head: ExportedHead,
}

/// A loaded, validated classification pipeline.
#[derive(Debug)]
pub struct LinearPipeline {
    export: ExportedPipeline,
}

impl LinearPipeline {
    /// Validate an export and wrap it as a usable pipeline.
    ///
    /// # Errors
    /// Returns a description of the first internal inconsistency found
    /// (unknown format version, uncovered feature name, dimension
    /// mismatch, degenerate scaler).
    pub fn from_export(export: ExportedPipeline) -> Result<Self, String> {
        if export.format_version != FORMAT_VERSION {
            return Err(format!(
                "unsupported format_version {} (expected {})",
                export.format_version, FORMAT_VERSION
            ));
        }
        if export.feature_names.is_empty() {
            return Err("feature_names is empty".to_string());
        }

        // Every feature name must be covered by exactly one preprocessing
        // step, and every step must correspond to a feature name.
        let mut encoded_len = 0usize;
        for name in &export.feature_names {
            let numeric = export.preprocess.numeric.iter().find(|s| &s.name == name);
            let categorical = export
                .preprocess
                .categorical
                .iter()
                .find(|e| &e.name == name);

            match (numeric, categorical) {
                (Some(scaler), None) => {
                    if scaler.std <= 0.0 || !scaler.std.is_finite() {
                        return Err(format!("degenerate std for column {name:?}"));
                    }
                    encoded_len += 1;
                }
                (None, Some(encoder)) => {
                    if encoder.categories.is_empty() {
                        return Err(format!("empty category list for column {name:?}"));
                    }
                    encoded_len += encoder.categories.len();
                }
                (Some(_), Some(_)) => {
                    return Err(format!("column {name:?} is both numeric and categorical"));
                }
                (None, None) => {
                    return Err(format!("no preprocessing for column {name:?}"));
                }
            }
        }

        let covered = export.preprocess.numeric.len() + export.preprocess.categorical.len();
        if covered != export.feature_names.len() {
            return Err(format!(
                "preprocessing covers {covered} columns but feature_names has {}",
                export.feature_names.len()
            ));
        }

        match &export.head {
            ExportedHead::Logistic {
                coefficients,
                intercept: _,
            }
            | ExportedHead::LinearSvc {
                coefficients,
                intercept: _,
            } => {
                if coefficients.len() != encoded_len {
                    return Err(format!(
                        "head expects {} inputs but preprocessing yields {encoded_len}",
                        coefficients.len()
                    ));
                }
            }
            ExportedHead::Mlp { layers } => {
                if layers.is_empty() {
                    return Err("mlp head has no layers".to_string());
                }
                let mut input_len = encoded_len;
                for (i, layer) in layers.iter().enumerate() {
                    if layer.weights.is_empty() {
                        return Err(format!("mlp layer {i} has no units"));
                    }
                    if layer.biases.len() != layer.weights.len() {
                        return Err(format!("mlp layer {i} bias/unit count mismatch"));
                    }
                    for row in &layer.weights {
                        if row.len() != input_len {
                            return Err(format!(
                                "mlp layer {i} expects {} inputs but gets {input_len}",
                                row.len()
                            ));
                        }
                    }
                    input_len = layer.weights.len();
                }
                if input_len != 1 {
                    return Err(format!(
                        "mlp output layer must have exactly 1 unit, found {input_len}"
                    ));
                }
            }
        }

        Ok(Self { export })
    }

    /// Column names the pipeline was fit on.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.export.feature_names
    }

    /// Short name of the classifier head, for logging.
    #[must_use]
    pub fn head_kind(&self) -> &'static str {
        match self.export.head {
            ExportedHead::Logistic { .. } => "logistic",
            ExportedHead::LinearSvc { .. } => "linear_svc",
            ExportedHead::Mlp { .. } => "mlp",
        }
    }

    /// Whether the head has a probability estimator.
    #[must_use]
    pub fn supports_probability(&self) -> bool {
        !matches!(self.export.head, ExportedHead::LinearSvc { .. })
    }

    /// Check that the record schema byte-matches the fitted columns.
    fn check_schema(&self) -> Result<(), PipelineError> {
        let matches = self.export.feature_names.len() == FeatureRecord::COLUMNS.len()
            && self
                .export
                .feature_names
                .iter()
                .zip(FeatureRecord::COLUMNS)
                .all(|(fitted, column)| fitted == column);

        if matches {
            Ok(())
        } else {
            Err(PipelineError::SchemaMismatch {
                expected: self.export.feature_names.join(", "),
                got: FeatureRecord::COLUMNS.join(", "),
            })
        }
    }

    /// Scale and one-hot encode a record in fitted column order.
    fn encode(&self, record: &FeatureRecord) -> Result<Vec<f64>, PipelineError> {
        let mut encoded = Vec::new();

        for name in &self.export.feature_names {
            if let Some(scaler) = self.export.preprocess.numeric.iter().find(|s| &s.name == name) {
                let value = record.numeric(name).ok_or_else(|| {
                    PipelineError::SchemaMismatch {
                        expected: self.export.feature_names.join(", "),
                        got: FeatureRecord::COLUMNS.join(", "),
                    }
                })?;
                encoded.push((value - scaler.mean) / scaler.std);
            } else if let Some(encoder) = self
                .export
                .preprocess
                .categorical
                .iter()
                .find(|e| &e.name == name)
            {
                let label = record.categorical(name).ok_or_else(|| {
                    PipelineError::SchemaMismatch {
                        expected: self.export.feature_names.join(", "),
                        got: FeatureRecord::COLUMNS.join(", "),
                    }
                })?;
                let hit = encoder.categories.iter().position(|c| c == label).ok_or_else(
                    || PipelineError::UnknownCategory {
                        column: name.clone(),
                        label: label.to_string(),
                    },
                )?;
                for i in 0..encoder.categories.len() {
                    encoded.push(if i == hit { 1.0 } else { 0.0 });
                }
            }
            // from_export guarantees one of the two branches matched
        }

        Ok(encoded)
    }

    /// Raw decision value (pre-sigmoid logit for logistic/mlp, signed
    /// margin for linear_svc).
    fn decision(&self, encoded: &[f64]) -> f64 {
        match &self.export.head {
            ExportedHead::Logistic {
                coefficients,
                intercept,
            }
            | ExportedHead::LinearSvc {
                coefficients,
                intercept,
            } => dot(coefficients, encoded) + intercept,
            ExportedHead::Mlp { layers } => {
                let mut activations = encoded.to_vec();
                let last = layers.len() - 1;
                for (i, layer) in layers.iter().enumerate() {
                    let mut next = Vec::with_capacity(layer.weights.len());
                    for (row, bias) in layer.weights.iter().zip(&layer.biases) {
                        let z = dot(row, &activations) + bias;
                        // Hidden layers are ReLU; the output unit stays linear
                        // and is squashed by the caller.
                        next.push(if i < last { z.max(0.0) } else { z });
                    }
                    activations = next;
                }
                activations[0]
            }
        }
    }

    fn score(&self, record: &FeatureRecord) -> Result<(RiskLabel, Option<f64>), PipelineError> {
        let encoded = self.encode(record)?;
        let decision = self.decision(&encoded);

        if self.supports_probability() {
            let probability = sigmoid(decision);
            let label = RiskLabel::from_class(u8::from(probability >= 0.5));
            Ok((label, Some(probability)))
        } else {
            let label = RiskLabel::from_class(u8::from(decision >= 0.0));
            Ok((label, None))
        }
    }
}

impl Pipeline for LinearPipeline {
    fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<RiskLabel>, PipelineError> {
        self.check_schema()?;
        rows.iter().map(|r| self.score(r).map(|(l, _)| l)).collect()
    }

    fn predict_probability(
        &self,
        rows: &[FeatureRecord],
    ) -> Result<Option<Vec<f64>>, PipelineError> {
        self.check_schema()?;
        if !self.supports_probability() {
            return Ok(None);
        }

        let mut probabilities = Vec::with_capacity(rows.len());
        for row in rows {
            let (_, probability) = self.score(row)?;
            // supports_probability() holds, so probability is always present
            probabilities.push(probability.unwrap_or_default());
        }
        Ok(Some(probabilities))
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// An export over the full 13-column schema with identity scaling and
    /// all-zero logistic coefficients: every record scores p = sigmoid(intercept).
    pub fn sample_export(head: ExportedHead) -> ExportedPipeline {
        let numeric_columns = [
            "age", "gender", "height", "weight", "ap_hi", "ap_lo", "age_years", "imc",
        ];
        let categorical_columns: [(&str, &[&str]); 5] = [
            ("cholesterol", &["Normal", "Medio", "Alto"]),
            ("gluc", &["Normal", "Elevada", "Muy Elevada"]),
            ("smoke", &["No fuma", "Fuma"]),
            ("alco", &["No consume alcohol", "Consume alcohol"]),
            ("active", &["Activo", "Inactivo"]),
        ];

        ExportedPipeline {
            format_version: 1,
            feature_names: FeatureRecord::COLUMNS.iter().map(|c| c.to_string()).collect(),
            preprocess: ExportedPreprocess {
                numeric: numeric_columns
                    .iter()
                    .map(|name| NumericScaler {
                        name: name.to_string(),
                        mean: 0.0,
                        std: 1.0,
                    })
                    .collect(),
                categorical: categorical_columns
                    .iter()
                    .map(|(name, categories)| CategoricalEncoder {
                        name: name.to_string(),
                        categories: categories.iter().map(|c| c.to_string()).collect(),
                    })
                    .collect(),
            },
            head,
        }
    }

    /// Encoded width of the sample export: 8 numeric + 3+3+2+2+2 one-hot.
    pub const SAMPLE_ENCODED_LEN: usize = 20;

    pub fn zero_logistic(intercept: f64) -> ExportedHead {
        ExportedHead::Logistic {
            coefficients: vec![0.0; SAMPLE_ENCODED_LEN],
            intercept,
        }
    }

    pub fn sample_export_json() -> String {
        serde_json::to_string(&sample_export(zero_logistic(0.0))).expect("Should serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::{assemble, CholesterolLevel, GlucoseLevel, PatientInput};

    fn reference_record() -> FeatureRecord {
        assemble(&PatientInput {
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
        })
    }

    #[test]
    fn test_logistic_probability_from_intercept() {
        let pipeline =
            LinearPipeline::from_export(sample_export(zero_logistic(2.0))).expect("Should build");
        let record = reference_record();

        let labels = pipeline.predict(std::slice::from_ref(&record)).expect("Should predict");
        assert_eq!(labels, vec![RiskLabel::AtRisk]);

        let probabilities = pipeline
            .predict_probability(std::slice::from_ref(&record))
            .expect("Should predict")
            .expect("Logistic head supports probability");
        // sigmoid(2.0) ~ 0.8808
        assert!((probabilities[0] - 0.8808).abs() < 1e-3);
    }

    #[test]
    fn test_negative_intercept_is_not_at_risk() {
        let pipeline =
            LinearPipeline::from_export(sample_export(zero_logistic(-1.0))).expect("Should build");
        let labels = pipeline
            .predict(std::slice::from_ref(&reference_record()))
            .expect("Should predict");
        assert_eq!(labels, vec![RiskLabel::NotAtRisk]);
    }

    #[test]
    fn test_linear_svc_has_no_probability() {
        let head = ExportedHead::LinearSvc {
            coefficients: vec![0.0; SAMPLE_ENCODED_LEN],
            intercept: 1.0,
        };
        let pipeline = LinearPipeline::from_export(sample_export(head)).expect("Should build");
        let record = reference_record();

        assert!(!pipeline.supports_probability());
        let labels = pipeline.predict(std::slice::from_ref(&record)).expect("Should predict");
        assert_eq!(labels, vec![RiskLabel::AtRisk]);

        let probabilities = pipeline
            .predict_probability(std::slice::from_ref(&record))
            .expect("Should not error");
        assert!(probabilities.is_none());
    }

    #[test]
    fn test_single_unit_mlp_matches_logistic() {
        let head = ExportedHead::Mlp {
            layers: vec![ExportedLayer {
                weights: vec![vec![0.0; SAMPLE_ENCODED_LEN]],
                biases: vec![2.0],
            }],
        };
        let pipeline = LinearPipeline::from_export(sample_export(head)).expect("Should build");
        let probabilities = pipeline
            .predict_probability(std::slice::from_ref(&reference_record()))
            .expect("Should predict")
            .expect("MLP head supports probability");
        assert!((probabilities[0] - 0.8808).abs() < 1e-3);
    }

    #[test]
    fn test_hidden_layer_relu() {
        // One hidden unit with weight 0 and bias -3 (clamped to 0 by ReLU),
        // output unit maps it through weight 5 and bias 1: logit = 1.
        let head = ExportedHead::Mlp {
            layers: vec![
                ExportedLayer {
                    weights: vec![vec![0.0; SAMPLE_ENCODED_LEN]],
                    biases: vec![-3.0],
                },
                ExportedLayer {
                    weights: vec![vec![5.0]],
                    biases: vec![1.0],
                },
            ],
        };
        let pipeline = LinearPipeline::from_export(sample_export(head)).expect("Should build");
        let probabilities = pipeline
            .predict_probability(std::slice::from_ref(&reference_record()))
            .expect("Should predict")
            .expect("Should have probability");
        // sigmoid(1.0) ~ 0.7311
        assert!((probabilities[0] - 0.7311).abs() < 1e-3);
    }

    #[test]
    fn test_misnamed_column_is_schema_mismatch() {
        let mut export = sample_export(zero_logistic(0.0));
        export.feature_names[0] = "edad".to_string();
        export.preprocess.numeric[0].name = "edad".to_string();
        let pipeline = LinearPipeline::from_export(export).expect("Internally consistent");

        let err = pipeline
            .predict(std::slice::from_ref(&reference_record()))
            .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_unknown_category() {
        let pipeline =
            LinearPipeline::from_export(sample_export(zero_logistic(0.0))).expect("Should build");
        let mut record = reference_record();
        record.cholesterol = "Desconocido".to_string();

        let err = pipeline.predict(std::slice::from_ref(&record)).unwrap_err();
        match err {
            PipelineError::UnknownCategory { column, label } => {
                assert_eq!(column, "cholesterol");
                assert_eq!(label, "Desconocido");
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_coefficient_length_checked_at_load() {
        let head = ExportedHead::Logistic {
            coefficients: vec![0.0; SAMPLE_ENCODED_LEN - 1],
            intercept: 0.0,
        };
        assert!(LinearPipeline::from_export(sample_export(head)).is_err());
    }

    #[test]
    fn test_uncovered_column_rejected_at_load() {
        let mut export = sample_export(zero_logistic(0.0));
        export.preprocess.numeric.retain(|s| s.name != "imc");
        assert!(LinearPipeline::from_export(export).is_err());
    }

    #[test]
    fn test_degenerate_scaler_rejected() {
        let mut export = sample_export(zero_logistic(0.0));
        export.preprocess.numeric[0].std = 0.0;
        assert!(LinearPipeline::from_export(export).is_err());
    }
}
