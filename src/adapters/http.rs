//! HTTP gateway: JSON over a blocking `reqwest` client.
//!
//! Used when `CARDIOPREDICT_BACKEND=http`. Calls are made from worker
//! threads, never the UI thread.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::{Credentials, IntakePayload, PredictionResponse, Registration, UserSession};
use crate::ports::{AuthGateway, GatewayError, PredictorGateway};

pub const PREDICT_ENDPOINT: &str = "/predict";
pub const SIGN_UP_ENDPOINT: &str = "/signup";
pub const SIGN_IN_ENDPOINT: &str = "/signin";

/// Prediction and auth backend reached over HTTP.
pub struct HttpGateway {
    client: Client,
    config: AppConfig,
}

impl HttpGateway {
    /// Build a client honouring the configured request timeout.
    ///
    /// # Errors
    /// Returns `GatewayError::Transport` if the TLS backend cannot initialise.
    pub fn new(config: AppConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.format_api_url(endpoint);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Backend returned error status");
            return Err(GatewayError::Status(status.as_u16()));
        }

        response
            .json::<R>()
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

fn map_transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

impl PredictorGateway for HttpGateway {
    fn submit(&self, payload: &IntakePayload) -> Result<PredictionResponse, GatewayError> {
        self.post(PREDICT_ENDPOINT, payload)
    }
}

impl AuthGateway for HttpGateway {
    fn sign_up(&self, registration: &Registration) -> Result<UserSession, GatewayError> {
        self.post(SIGN_UP_ENDPOINT, registration)
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<UserSession, GatewayError> {
        self.post(SIGN_IN_ENDPOINT, credentials)
    }
}
