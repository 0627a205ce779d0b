//! Desktop Volume Mixer - Library
//!
//! A per-application volume mixer widget that lives on the Windows desktop.
//!
//! ## Features
//!
//! - One slider per active audio session on the default output device
//! - Session list rebuilt only when the session count changes
//! - Pinned on top while the desktop has focus, so "Show Desktop" cannot hide it
//! - Pushed to the bottom of the z-order behind every other window otherwise
//! - Hidden from the taskbar and Alt+Tab; tray icon to exit

#[cfg(windows)]
pub mod app;
pub mod audio;
pub mod config;
pub mod logging;
pub mod presentation;
pub mod scheduler;
#[cfg(windows)]
pub mod ui;
pub mod window;

pub use audio::{
    AudioError, AudioSession, ChangeDetection, RefreshOutcome, SessionRegistry, SessionSnapshot,
    VolumeBinding,
};
pub use config::MixerConfig;
pub use presentation::{MixerView, Presenter};
pub use scheduler::{Cadence, TickReport, TickScheduler};
pub use window::{VisibilityController, WidgetVisibility, WindowError};
