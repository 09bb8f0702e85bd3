//! Prediction result types and risk interpretation.

use serde::{Deserialize, Serialize};

/// Binary prediction label of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    /// Class 0: no cardiovascular risk predicted
    NotAtRisk,
    /// Class 1: cardiovascular risk predicted
    AtRisk,
}

impl RiskLabel {
    /// Build from the classifier's class index.
    #[must_use]
    pub fn from_class(class: u8) -> Self {
        if class == 0 {
            Self::NotAtRisk
        } else {
            Self::AtRisk
        }
    }

    /// Headline text for the result view.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::NotAtRisk => "Sin riesgo cardiovascular",
            Self::AtRisk => "Con riesgo cardiovascular",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAtRisk => write!(f, "Sin riesgo"),
            Self::AtRisk => write!(f, "Con riesgo"),
        }
    }
}

/// Four-tier ordinal interpretation of the predicted probability.
///
/// Boundaries are half-open on the lower bound: exactly 0.25 is
/// `LowModerate`, exactly 0.50 is `Moderate`, exactly 0.75 is `High`.
/// The tier is derived from probability alone and never overrides the
/// binary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    /// probability < 0.25
    VeryLow,
    /// 0.25 <= probability < 0.50
    LowModerate,
    /// 0.50 <= probability < 0.75
    Moderate,
    /// probability >= 0.75
    High,
}

impl RiskTier {
    /// Map a probability in [0, 1] to its tier.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.25 {
            Self::VeryLow
        } else if probability < 0.50 {
            Self::LowModerate
        } else if probability < 0.75 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Human-readable interpretation message.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very low estimated risk",
            Self::LowModerate => "Low to moderate estimated risk",
            Self::Moderate => "Moderate estimated risk - follow-up recommended",
            Self::High => "High estimated risk - consultation advised",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryLow => write!(f, "VERY LOW"),
            Self::LowModerate => write!(f, "LOW-MODERATE"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of one prediction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Binary prediction from the classifier
    pub label: RiskLabel,

    /// Estimated P(class 1), absent if the model head has no
    /// probability estimator
    pub probability: Option<f64>,

    /// Tier interpretation; present exactly when `probability` is
    pub tier: Option<RiskTier>,

    /// When the prediction was made
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    /// Create a prediction, deriving the tier from the probability when
    /// one is available.
    #[must_use]
    pub fn new(label: RiskLabel, probability: Option<f64>) -> Self {
        Self {
            label,
            probability,
            tier: probability.map(RiskTier::from_probability),
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskTier::from_probability(0.24999), RiskTier::VeryLow);
        assert_eq!(RiskTier::from_probability(0.25), RiskTier::LowModerate);
        assert_eq!(RiskTier::from_probability(0.50), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.75), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.9), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::VeryLow);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::VeryLow < RiskTier::LowModerate);
        assert!(RiskTier::LowModerate < RiskTier::Moderate);
        assert!(RiskTier::Moderate < RiskTier::High);
    }

    #[test]
    fn test_label_from_class() {
        assert_eq!(RiskLabel::from_class(0), RiskLabel::NotAtRisk);
        assert_eq!(RiskLabel::from_class(1), RiskLabel::AtRisk);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(RiskLabel::NotAtRisk.to_string(), "Sin riesgo");
        assert_eq!(RiskLabel::AtRisk.to_string(), "Con riesgo");
    }

    #[test]
    fn test_prediction_without_probability_has_no_tier() {
        let prediction = Prediction::new(RiskLabel::AtRisk, None);
        assert!(prediction.probability.is_none());
        assert!(prediction.tier.is_none());
    }

    #[test]
    fn test_prediction_tier_derivation() {
        let prediction = Prediction::new(RiskLabel::AtRisk, Some(0.82));
        assert_eq!(prediction.tier, Some(RiskTier::High));
    }
}
