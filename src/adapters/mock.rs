//! In-process mock backends.
//!
//! These stand in for the prediction service, auth endpoints and history
//! database during development. Each one sleeps for a configurable delay
//! before answering so the UI's pending states are visible.
//!
//! # Mutex Behavior
//!
//! The predictor RNG and the history records sit behind `Mutex`. A poisoned
//! lock fails closed with an error instead of panicking.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::{
    Credentials, HistoricalRecord, IntakePayload, ModelResult, PredictionResponse, Registration,
    UserSession,
};
use crate::ports::{AuthGateway, GatewayError, HistoryStore, PredictorGateway, StoreError};

/// Models reported by the mock predictor: (name, accuracy, confidence).
const MOCK_MODELS: [(&str, f64, f64); 4] = [
    ("Random Forest", 0.89, 0.92),
    ("Logistic Regression", 0.85, 0.88),
    ("Support Vector Machine", 0.87, 0.90),
    ("Neural Network", 0.91, 0.94),
];

/// Predictor returning four fixed models with random risk in `[0.1, 0.4)`.
pub struct MockPredictor {
    delay: Duration,
    rng: Mutex<ChaCha20Rng>,
}

impl MockPredictor {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    /// Deterministic predictor for tests.
    #[must_use]
    pub fn seeded(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl PredictorGateway for MockPredictor {
    fn submit(&self, payload: &IntakePayload) -> Result<PredictionResponse, GatewayError> {
        tracing::debug!(age = payload.age, "Mock predictor received assessment");
        thread::sleep(self.delay);

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GatewayError::Transport("mock RNG unavailable".to_string()))?;

        let results = MOCK_MODELS
            .iter()
            .map(|&(name, accuracy, confidence)| {
                let prediction = rng.gen::<f64>() * 0.3 + 0.1;
                ModelResult::new(name, accuracy, prediction, confidence)
            })
            .collect();

        Ok(PredictionResponse {
            success: true,
            results,
        })
    }
}

/// Auth backend that accepts any well-formed request.
pub struct MockAuth {
    delay: Duration,
}

impl MockAuth {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl AuthGateway for MockAuth {
    fn sign_up(&self, registration: &Registration) -> Result<UserSession, GatewayError> {
        thread::sleep(self.delay);
        Ok(UserSession {
            first_name: Some(registration.first_name.clone()),
            last_name: Some(registration.last_name.clone()),
            email: registration.email.clone(),
        })
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<UserSession, GatewayError> {
        thread::sleep(self.delay);
        Ok(UserSession {
            first_name: None,
            last_name: None,
            email: credentials.email.clone(),
        })
    }
}

/// History held in memory, seeded with three sample assessments.
pub struct InMemoryHistoryStore {
    delay: Duration,
    records: Mutex<Vec<HistoricalRecord>>,
}

impl InMemoryHistoryStore {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self::with_records(delay, sample_records())
    }

    #[must_use]
    pub fn with_records(delay: Duration, records: Vec<HistoricalRecord>) -> Self {
        Self {
            delay,
            records: Mutex::new(records),
        }
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn load_records(&self) -> Result<Vec<HistoricalRecord>, StoreError> {
        thread::sleep(self.delay);
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.clone())
    }

    fn delete_record(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }
}

/// The three assessments shown on first launch.
#[must_use]
pub fn sample_records() -> Vec<HistoricalRecord> {
    struct Row {
        id: &'static str,
        date: (i32, u32, u32),
        risk: f64,
        accuracy: f64,
        model: &'static str,
        age: u8,
        bp: (f64, f64),
        cholesterol: f64,
        bmi: f64,
        heart_rate: f64,
    }

    let rows = [
        Row {
            id: "1",
            date: (2024, 8, 15),
            risk: 0.25,
            accuracy: 0.92,
            model: "Neural Network",
            age: 45,
            bp: (130.0, 85.0),
            cholesterol: 195.0,
            bmi: 26.5,
            heart_rate: 72.0,
        },
        Row {
            id: "2",
            date: (2024, 7, 20),
            risk: 0.18,
            accuracy: 0.89,
            model: "Random Forest",
            age: 45,
            bp: (125.0, 80.0),
            cholesterol: 185.0,
            bmi: 25.8,
            heart_rate: 68.0,
        },
        Row {
            id: "3",
            date: (2024, 6, 10),
            risk: 0.32,
            accuracy: 0.87,
            model: "SVM",
            age: 44,
            bp: (140.0, 90.0),
            cholesterol: 210.0,
            bmi: 27.2,
            heart_rate: 78.0,
        },
    ];

    rows.into_iter()
        .filter_map(|row| {
            let date = NaiveDate::from_ymd_opt(row.date.0, row.date.1, row.date.2)?;
            Some(HistoricalRecord {
                id: row.id.to_string(),
                date,
                risk_level: row.risk,
                accuracy: row.accuracy,
                best_model: row.model.to_string(),
                age: row.age,
                gender: "Male".to_string(),
                systolic_bp: row.bp.0,
                diastolic_bp: row.bp.1,
                cholesterol: row.cholesterol,
                bmi: row.bmi,
                heart_rate: row.heart_rate,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::{sample_values, IntakeForm};
    use crate::domain::Assessment;

    fn payload() -> IntakePayload {
        IntakeForm::parse(&sample_values())
            .expect("Sample data should validate")
            .to_payload()
    }

    #[test]
    fn test_mock_predictor_shape() {
        let predictor = MockPredictor::seeded(Duration::ZERO, 7);
        let response = predictor.submit(&payload()).expect("Mock never fails");

        assert!(response.success);
        let names: Vec<&str> = response.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Random Forest",
                "Logistic Regression",
                "Support Vector Machine",
                "Neural Network"
            ]
        );
        for r in &response.results {
            assert!((0.1..0.4).contains(&r.prediction), "prediction {}", r.prediction);
        }

        // Best model is decided by accuracy alone.
        let assessment = Assessment::from_results(response.results).expect("Non-empty");
        assert_eq!(assessment.best().name, "Neural Network");
    }

    #[test]
    fn test_seeded_predictor_is_deterministic() {
        let a = MockPredictor::seeded(Duration::ZERO, 42).submit(&payload()).expect("ok");
        let b = MockPredictor::seeded(Duration::ZERO, 42).submit(&payload()).expect("ok");
        assert_eq!(a.results, b.results);
    }

    #[test]
    fn test_mock_auth_sessions() {
        let auth = MockAuth::new(Duration::ZERO);
        let session = auth
            .sign_in(&Credentials {
                email: "jane@example.com".to_string(),
                password: "x".to_string(),
            })
            .expect("Mock accepts");
        assert_eq!(session.display_name(), "jane@example.com");
    }

    #[test]
    fn test_history_store_delete() {
        let store = InMemoryHistoryStore::new(Duration::ZERO);
        assert_eq!(store.load_records().expect("load").len(), 3);

        assert!(store.delete_record("2").expect("delete"));
        assert!(!store.delete_record("2").expect("delete again"));

        let ids: Vec<String> = store
            .load_records()
            .expect("load")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
