//! Assistant port: Trait for the health chat responder.

use super::GatewayError;
use crate::domain::Assessment;

/// Produces a reply to a free-text health question.
///
/// The current assessment is passed in so replies can depend on whether
/// results exist. Implementations are free to ignore it.
pub trait HealthAssistant: Send + Sync {
    /// Reply to `message`.
    ///
    /// # Errors
    /// Returns `GatewayError` when a remote responder fails. The
    /// conversation shows a fixed apology instead of the detail.
    fn respond(&self, message: &str, context: Option<&Assessment>) -> Result<String, GatewayError>;
}
