//! UI components and application module
//!
//! egui/eframe-based presentation layer for Parley.

mod app;
pub mod components;
mod state;
mod theme;

pub use app::ParleyApp;
pub use state::AppState;
pub use theme::Theme;
