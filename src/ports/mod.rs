//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (prediction service,
//! auth backend, chat responder, history store).

mod assistant;
mod auth;
mod history;
mod predictor;

pub use assistant::HealthAssistant;
pub use auth::AuthGateway;
pub use history::{HistoryStore, StoreError};
pub use predictor::{GatewayError, PredictorGateway};
