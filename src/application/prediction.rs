//! Prediction service: intake form to aggregated assessment.
//!
//! This service coordinates:
//! - Form validation
//! - Payload encoding
//! - Submission to the prediction backend
//! - Aggregation and risk tiering

use std::sync::Arc;

use crate::domain::{Assessment, FieldErrors, FormValues, IntakeForm, IntakePayload};
use crate::ports::PredictorGateway;
use crate::CardioError;

/// Shown on the home page whenever a submission fails for a non-field reason.
pub const ANALYSIS_FAILED: &str = "Failed to analyze your data. Please try again.";

/// Service for running risk predictions.
pub struct PredictionService<P: ?Sized = dyn PredictorGateway> {
    predictor: Arc<P>,
}

impl<P: ?Sized> Clone for PredictionService<P> {
    fn clone(&self) -> Self {
        Self {
            predictor: Arc::clone(&self.predictor),
        }
    }
}

impl<P> PredictionService<P>
where
    P: PredictorGateway + ?Sized,
{
    pub fn new(predictor: Arc<P>) -> Self {
        Self { predictor }
    }

    /// Validate raw form values and encode them for the backend.
    ///
    /// # Errors
    /// Returns every failing field; nothing is sent.
    pub fn prepare(&self, values: &FormValues) -> Result<IntakePayload, FieldErrors> {
        let form = IntakeForm::parse(values)?;
        tracing::debug!("Intake form validated");
        Ok(form.to_payload())
    }

    /// Submit an encoded payload and aggregate the per-model results.
    ///
    /// # Errors
    /// Returns `CardioError::Gateway` on backend failure,
    /// `CardioError::PredictionRejected` when the backend reports
    /// `success: false`, and `CardioError::Aggregate` for an empty result set.
    pub fn predict(&self, payload: &IntakePayload) -> Result<Assessment, CardioError> {
        tracing::debug!("Submitting assessment to predictor");
        let response = self.predictor.submit(payload)?;

        if !response.success {
            tracing::warn!("Predictor reported failure");
            return Err(CardioError::PredictionRejected);
        }

        let assessment = Assessment::from_results(response.results)?;
        tracing::info!(
            "Prediction complete: models={}, average={:.4}, best={}, tier={}",
            assessment.results.len(),
            assessment.average_prediction,
            assessment.best().name,
            assessment.tier
        );
        Ok(assessment)
    }

    /// Validate, encode, submit and aggregate in one call.
    ///
    /// # Errors
    /// Returns `CardioError::Validation` before any backend call when the form
    /// is invalid, otherwise as [`Self::predict`].
    pub fn assess(&self, values: &FormValues) -> Result<Assessment, CardioError> {
        let payload = self.prepare(values)?;
        self.predict(&payload)
    }
}

/// Message for the result panel after a failed submission.
#[must_use]
pub fn failure_message(err: &CardioError) -> String {
    match err {
        CardioError::Validation(errors) => format!("Please correct the form: {errors}"),
        _ => ANALYSIS_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::{fields, sample_values};
    use crate::domain::{ModelResult, PredictionResponse, RiskTier};
    use crate::ports::GatewayError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed four-model backend that counts calls.
    struct FixedPredictor {
        response: Result<PredictionResponse, GatewayError>,
        calls: AtomicUsize,
    }

    impl FixedPredictor {
        fn new(response: Result<PredictionResponse, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl PredictorGateway for FixedPredictor {
        fn submit(&self, _payload: &IntakePayload) -> Result<PredictionResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn four_models() -> PredictionResponse {
        PredictionResponse {
            success: true,
            results: vec![
                ModelResult::new("Random Forest", 0.89, 0.22, 0.92),
                ModelResult::new("Logistic Regression", 0.85, 0.31, 0.88),
                ModelResult::new("Support Vector Machine", 0.87, 0.18, 0.90),
                ModelResult::new("Neural Network", 0.91, 0.29, 0.94),
            ],
        }
    }

    #[test]
    fn test_end_to_end_assessment() {
        let predictor = FixedPredictor::new(Ok(four_models()));
        let service = PredictionService::new(Arc::clone(&predictor));

        let assessment = service.assess(&sample_values()).expect("Should assess");

        assert_eq!(assessment.best().name, "Neural Network");
        assert!((assessment.average_prediction - 0.25).abs() < 1e-9);
        assert_eq!(assessment.tier, RiskTier::Low);
        assert_eq!(assessment.tier.label(), "Low");
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_form_never_reaches_backend() {
        let predictor = FixedPredictor::new(Ok(four_models()));
        let service = PredictionService::new(Arc::clone(&predictor));

        let values = sample_values().with(fields::AGE, "0");
        let err = service.assess(&values).expect_err("Age 0 is invalid");

        assert!(matches!(err, CardioError::Validation(ref e) if e.contains(fields::AGE)));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
        assert!(failure_message(&err).starts_with("Please correct the form"));
    }

    #[test]
    fn test_backend_failures_map_to_generic_message() {
        let rejected = PredictionResponse {
            success: false,
            results: Vec::new(),
        };
        let cases: Vec<Result<PredictionResponse, GatewayError>> = vec![
            Ok(rejected),
            Err(GatewayError::Status(500)),
            Err(GatewayError::Timeout),
            Ok(PredictionResponse {
                success: true,
                results: Vec::new(),
            }),
        ];

        for case in cases {
            let service = PredictionService::new(FixedPredictor::new(case));
            let err = service.assess(&sample_values()).expect_err("Should fail");
            assert_eq!(failure_message(&err), ANALYSIS_FAILED);
        }
    }

    #[test]
    fn test_dyn_service_is_cloneable() {
        let predictor: Arc<dyn PredictorGateway> = FixedPredictor::new(Ok(four_models()));
        let service: PredictionService = PredictionService::new(predictor);
        let copy = service.clone();
        assert!(copy.assess(&sample_values()).is_ok());
    }
}
