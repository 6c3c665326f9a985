//! Predictor port: Trait for the remote multi-model prediction service.
//!
//! The service receives the encoded intake payload and answers with one
//! result per model. Aggregation happens on this side.

use crate::domain::{IntakePayload, PredictionResponse};

/// Errors raised by any backend gateway (prediction, auth).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Could not reach backend: {0}")]
    Transport(String),

    #[error("Backend responded with status {0}")]
    Status(u16),

    #[error("Backend did not respond in time")]
    Timeout,

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Trait for the prediction backend.
///
/// Implementations may block; callers run them off the UI thread.
pub trait PredictorGateway: Send + Sync {
    /// Submit one assessment and return the raw per-model response.
    ///
    /// # Errors
    /// Returns `GatewayError` on transport failure, non-success status
    /// or an undecodable body. A decoded body with `success: false` is
    /// returned as `Ok` and judged by the caller.
    fn submit(&self, payload: &IntakePayload) -> Result<PredictionResponse, GatewayError>;
}
