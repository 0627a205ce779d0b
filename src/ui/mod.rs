//! UI module for the mixer widget and its tray icon.

pub mod components;
pub mod panel;
pub mod theme;
pub mod tray;

pub use panel::MixerPanel;
pub use theme::Theme;
pub use tray::{TrayError, TrayEvent, TrayManager};
