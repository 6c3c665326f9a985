//! Auth service: sign-up, sign-in and the forgot-password notice.

use std::sync::Arc;

use crate::domain::{Credentials, Registration, UserSession};
use crate::ports::AuthGateway;
use crate::CardioError;

pub const SIGN_UP_FAILED: &str = "Sign up failed. Please try again.";
pub const SIGN_IN_FAILED: &str = "Sign in failed. Please check your details and try again.";
pub const FORGOT_PASSWORD_NOTICE: &str =
    "Password reset is not available yet. Please contact support.";

pub struct AuthService<A: ?Sized = dyn AuthGateway> {
    gateway: Arc<A>,
}

impl<A: ?Sized> Clone for AuthService<A> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<A> AuthService<A>
where
    A: AuthGateway + ?Sized,
{
    pub fn new(gateway: Arc<A>) -> Self {
        Self { gateway }
    }

    /// Create an account. The registration (and its password) is dropped
    /// and zeroized when this returns.
    ///
    /// # Errors
    /// Returns `CardioError::Gateway` if the backend refuses or is unreachable.
    pub fn sign_up(&self, registration: Registration) -> Result<UserSession, CardioError> {
        let session = self.gateway.sign_up(&registration).map_err(|e| {
            tracing::warn!("Sign up failed: {}", e);
            e
        })?;
        tracing::info!("Account created");
        Ok(session)
    }

    /// # Errors
    /// Returns `CardioError::Gateway` if the backend refuses or is unreachable.
    pub fn sign_in(&self, credentials: Credentials) -> Result<UserSession, CardioError> {
        let session = self.gateway.sign_in(&credentials).map_err(|e| {
            tracing::warn!("Sign in failed: {}", e);
            e
        })?;
        tracing::info!("Signed in");
        Ok(session)
    }

    /// Record the request and return the notice to show.
    #[must_use]
    pub fn forgot_password(&self) -> &'static str {
        tracing::info!("Forgot password requested");
        FORGOT_PASSWORD_NOTICE
    }
}
