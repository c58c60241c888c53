//! Formdesk designer application
//!
//! The eframe shell around `formdesk-core`: palette, canvas, property
//! panel, and the HTTP client for the template server.

mod app;
mod canvas;
mod file_ops;
pub mod remote;
mod ui;

pub use app::{AppConfig, AppError, DesignerApp, shortcut_events};
pub use canvas::cursor_icon;
pub use remote::HttpTemplateApi;
pub use ui::{Alert, UiAction, UiState, render_ui};
