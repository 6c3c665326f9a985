//! Adapters layer: Concrete implementations of ports.
//!
//! - `mock`: in-process predictor, auth and history store with simulated latency
//! - `http`: JSON gateway over `reqwest`
//! - `assistant`: keyword-table health assistant
//! - `sanitize`: account/contact data redaction for logs

pub mod assistant;
pub mod http;
pub mod mock;
pub mod sanitize;

pub use assistant::KeywordAssistant;
pub use http::HttpGateway;
pub use mock::{InMemoryHistoryStore, MockAuth, MockPredictor};
