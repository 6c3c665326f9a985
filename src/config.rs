//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend host for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_MOCK_DELAY_MS: u64 = 3_000;

/// Which gateway implementation to wire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-process mocks with simulated latency
    Mock,
    /// JSON over HTTP to `api_url`
    Http,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub backend: Backend,
    /// Upper bound on any pending backend call
    pub request_timeout: Duration,
    /// Simulated latency of the mock predictor
    pub mock_delay: Duration,
    /// Where history exports are written
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            backend: Backend::Mock,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            mock_delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Read configuration from `CARDIOPREDICT_*` variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("CARDIOPREDICT_API_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.api_url);

        let backend = match lookup("CARDIOPREDICT_BACKEND").as_deref() {
            Some("http") | Some("HTTP") => Backend::Http,
            Some("mock") | Some("MOCK") | None => Backend::Mock,
            Some(other) => {
                tracing::warn!("Unknown CARDIOPREDICT_BACKEND '{}', using mock", other);
                Backend::Mock
            }
        };

        let millis = |key: &str, default: Duration| -> Duration {
            match lookup(key) {
                Some(raw) => match raw.trim().parse::<u64>() {
                    Ok(ms) => Duration::from_millis(ms),
                    Err(_) => {
                        tracing::warn!("Invalid {} '{}', using default", key, raw);
                        default
                    }
                },
                None => default,
            }
        };

        let request_timeout = millis("CARDIOPREDICT_REQUEST_TIMEOUT_MS", defaults.request_timeout);
        let mock_delay = millis("CARDIOPREDICT_MOCK_DELAY_MS", defaults.mock_delay);

        let export_dir = lookup("CARDIOPREDICT_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Self {
            api_url,
            backend,
            request_timeout,
            mock_delay,
            export_dir,
        }
    }

    /// Mock sign-in/sign-up latency, two thirds of the prediction delay.
    #[must_use]
    pub fn mock_auth_delay(&self) -> Duration {
        self.mock_delay * 2 / 3
    }

    /// Mock history load and assistant reply latency, half the prediction delay.
    #[must_use]
    pub fn mock_history_delay(&self) -> Duration {
        self.mock_delay / 2
    }

    /// Join the configured base URL and an endpoint path.
    #[must_use]
    pub fn format_api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url, endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.backend, Backend::Mock);
        assert_eq!(cfg.request_timeout, Duration::from_secs(15));
        assert_eq!(cfg.mock_auth_delay(), Duration::from_millis(2000));
        assert_eq!(cfg.mock_history_delay(), Duration::from_millis(1500));
        assert_eq!(cfg.format_api_url("/predict"), "http://localhost:8000/predict");
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("CARDIOPREDICT_API_URL", "https://api.example.org/"),
            ("CARDIOPREDICT_BACKEND", "http"),
            ("CARDIOPREDICT_REQUEST_TIMEOUT_MS", "2500"),
            ("CARDIOPREDICT_MOCK_DELAY_MS", "0"),
        ]));
        assert_eq!(cfg.format_api_url("/signin"), "https://api.example.org/signin");
        assert_eq!(cfg.backend, Backend::Http);
        assert_eq!(cfg.request_timeout, Duration::from_millis(2500));
        assert_eq!(cfg.mock_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("CARDIOPREDICT_REQUEST_TIMEOUT_MS", "soon"),
            ("CARDIOPREDICT_BACKEND", "grpc"),
        ]));
        assert_eq!(cfg.request_timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(cfg.backend, Backend::Mock);
    }
}
