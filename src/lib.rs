//! # CardioPredict
//!
//! Terminal cardiovascular risk assessment.
//!
//! This crate provides:
//! - Intake form validation and numeric payload encoding
//! - Multi-model result aggregation and risk tiering
//! - A pluggable health assistant, history view and sign-in flow
//! - Terminal UI over mock or HTTP backends
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and pure logic (intake, assessment, risk, history)
//! - `ports`: Trait definitions for collaborators (predictor, assistant, auth, history)
//! - `adapters`: Concrete implementations (mock, HTTP, keyword assistant, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{Assessment, IntakePayload, ModelResult, RiskTier};

/// Result type for CardioPredict operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for CardioPredict
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("Invalid form data: {0}")]
    Validation(domain::FieldErrors),

    #[error("Backend request failed: {0}")]
    Gateway(#[from] ports::GatewayError),

    #[error("Cannot aggregate results: {0}")]
    Aggregate(#[from] domain::AggregateError),

    #[error("History store failed: {0}")]
    Store(#[from] ports::StoreError),

    #[error("Prediction backend reported failure")]
    PredictionRejected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<domain::FieldErrors> for CardioError {
    fn from(errors: domain::FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
