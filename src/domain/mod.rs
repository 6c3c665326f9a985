//! Domain layer: Core types and pure logic.
//!
//! Nothing here performs I/O. Validation, payload encoding, aggregation,
//! risk classification and history queries are all plain functions over
//! these types.

mod assessment;
pub mod history;
pub mod intake;
mod risk;
pub mod session;
pub mod validation;

pub use assessment::{
    average_risk, best_model, AggregateError, Assessment, ModelResult, PredictionResponse,
};
pub use history::{HistoricalRecord, SortKey, Trend, TrendDirection};
pub use intake::{Education, Gender, IntakeForm, IntakePayload};
pub use risk::{risk_tier, RiskTier, Severity};
pub use session::{Credentials, Registration, UserSession};
pub use validation::{FieldErrors, FormValues, Rule, Schema};
