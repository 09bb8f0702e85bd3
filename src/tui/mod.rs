//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Patient data input
//! - Prediction result with probability gauge and risk tier
//! - Model evaluation metrics

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
