//! Model results and the aggregate assessment derived from them.

use serde::{Deserialize, Serialize};

use super::risk::RiskTier;

/// One named model's output for a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Model display name (e.g. "Random Forest")
    pub name: String,

    /// Validation accuracy of the model (0.0 to 1.0)
    pub accuracy: f64,

    /// Predicted probability of cardiovascular disease (0.0 to 1.0)
    pub prediction: f64,

    /// Model confidence in this prediction (0.0 to 1.0)
    pub confidence: f64,
}

impl ModelResult {
    #[must_use]
    pub fn new(name: impl Into<String>, accuracy: f64, prediction: f64, confidence: f64) -> Self {
        Self {
            name: name.into(),
            accuracy,
            prediction,
            confidence,
        }
    }

    /// Risk tier of this model's own prediction.
    #[must_use]
    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::from_probability(self.prediction)
    }
}

/// Body returned by the prediction backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<ModelResult>,
}

/// Errors from aggregating model results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("No model results to aggregate")]
    Empty,
}

/// Result with the highest accuracy. The first one wins ties.
#[must_use]
pub fn best_model(results: &[ModelResult]) -> Option<&ModelResult> {
    results.iter().fold(None, |best, current| match best {
        Some(b) if current.accuracy > b.accuracy => Some(current),
        Some(b) => Some(b),
        None => Some(current),
    })
}

/// Arithmetic mean of predictions; `None` for an empty set.
#[must_use]
pub fn average_risk(results: &[ModelResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let sum: f64 = results.iter().map(|r| r.prediction).sum();
    Some(sum / results.len() as f64)
}

/// Aggregate view of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Model results in display order
    pub results: Vec<ModelResult>,

    /// Mean prediction across all models
    pub average_prediction: f64,

    /// Index into `results` of the most accurate model
    pub best_index: usize,

    /// Tier derived from `average_prediction`
    pub tier: RiskTier,
}

impl Assessment {
    /// Build an assessment from a non-empty result set.
    ///
    /// # Errors
    /// Returns `AggregateError::Empty` if `results` is empty.
    pub fn from_results(results: Vec<ModelResult>) -> Result<Self, AggregateError> {
        let average_prediction = average_risk(&results).ok_or(AggregateError::Empty)?;

        let mut best_index = 0;
        for (i, r) in results.iter().enumerate().skip(1) {
            if r.accuracy > results[best_index].accuracy {
                best_index = i;
            }
        }

        Ok(Self {
            tier: RiskTier::from_probability(average_prediction),
            results,
            average_prediction,
            best_index,
        })
    }

    #[must_use]
    pub fn best(&self) -> &ModelResult {
        &self.results[self.best_index]
    }

    #[must_use]
    pub fn is_best(&self, index: usize) -> bool {
        index == self.best_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_models() -> Vec<ModelResult> {
        vec![
            ModelResult::new("Random Forest", 0.89, 0.20, 0.92),
            ModelResult::new("Logistic Regression", 0.85, 0.30, 0.88),
            ModelResult::new("Support Vector Machine", 0.87, 0.25, 0.90),
            ModelResult::new("Neural Network", 0.91, 0.35, 0.94),
        ]
    }

    #[test]
    fn test_average_is_mean() {
        let avg = average_risk(&four_models()).expect("non-empty");
        assert!((avg - 0.275).abs() < 1e-12);
    }

    #[test]
    fn test_average_ignores_order() {
        let mut results = four_models();
        let forward = average_risk(&results).expect("non-empty");
        results.reverse();
        results.swap(0, 2);
        let shuffled = average_risk(&results).expect("non-empty");
        assert!((forward - shuffled).abs() < 1e-12);
    }

    #[test]
    fn test_empty_results() {
        assert!(average_risk(&[]).is_none());
        assert!(best_model(&[]).is_none());
        assert_eq!(Assessment::from_results(Vec::new()), Err(AggregateError::Empty));
    }

    #[test]
    fn test_best_model_first_wins_ties() {
        let results = vec![
            ModelResult::new("A", 0.80, 0.1, 0.9),
            ModelResult::new("B", 0.91, 0.2, 0.9),
            ModelResult::new("C", 0.91, 0.3, 0.9),
        ];
        assert_eq!(best_model(&results).map(|r| r.name.as_str()), Some("B"));

        let assessment = Assessment::from_results(results).expect("non-empty");
        assert_eq!(assessment.best().name, "B");
        assert!(assessment.is_best(1));
    }

    #[test]
    fn test_assessment_tier_from_average() {
        let assessment = Assessment::from_results(four_models()).expect("non-empty");
        assert_eq!(assessment.best().name, "Neural Network");
        assert_eq!(assessment.tier, RiskTier::Low);
    }

    #[test]
    fn test_response_without_results_field() {
        let resp: PredictionResponse =
            serde_json::from_str(r#"{"success": false}"#).expect("Should parse");
        assert!(!resp.success);
        assert!(resp.results.is_empty());
    }
}
