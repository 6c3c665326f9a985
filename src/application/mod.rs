//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

pub mod auth;
pub mod conversation;
pub mod history;
pub mod navigation;
pub mod prediction;

pub use auth::AuthService;
pub use conversation::{ChatMessage, Conversation, Sender};
pub use history::{HistoryService, HistorySummary, HistoryView};
pub use navigation::{NavEvent, Page, Shell};
pub use prediction::PredictionService;
