//! Window module for widget placement.
//!
//! This module watches the foreground window and keeps the mixer widget
//! either pinned on top or recessed to the bottom of the z-order.

pub mod monitor;
pub mod visibility;
#[cfg(windows)]
pub mod win32;

pub use monitor::{ForegroundMonitor, ForegroundWindow, WindowId, TITLE_CAPACITY};
pub use visibility::{VisibilityController, WidgetVisibility, WindowError, WindowPlacement};
