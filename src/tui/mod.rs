//! TUI module: Terminal User Interface using Ratatui.
//!
//! Pages:
//! - Home: intake form, risk results and the health assistant
//! - Sign In / Sign Up
//! - History (requires a session)

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::MedicalTheme;
pub use worker::{Worker, WorkerHandle, WorkerOutcome};
