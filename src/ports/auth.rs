//! Auth port: Trait for account creation and sign-in.

use super::GatewayError;
use crate::domain::{Credentials, Registration, UserSession};

pub trait AuthGateway: Send + Sync {
    /// Create an account and return the resulting session.
    ///
    /// # Errors
    /// Returns `GatewayError::Rejected` when the backend refuses the account.
    fn sign_up(&self, registration: &Registration) -> Result<UserSession, GatewayError>;

    /// Sign in with existing credentials.
    ///
    /// # Errors
    /// Returns `GatewayError::Rejected` for unknown credentials.
    fn sign_in(&self, credentials: &Credentials) -> Result<UserSession, GatewayError>;
}
