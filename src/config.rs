//! Fixed widget configuration.
//!
//! Nothing here is persisted; the mixer always reflects live OS state.

use crate::audio::ChangeDetection;
use std::time::Duration;

/// Title of the desktop shell window (focused after "Show Desktop").
pub const DESKTOP_SHELL_TITLE: &str = "Program Manager";

/// Title of the mixer widget window.
pub const WIDGET_TITLE: &str = "Desktop Volumater";

/// Poll cadence for both control loops.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Widget window size in logical pixels.
pub const WIDGET_SIZE: [f32; 2] = [270.0, 500.0];

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MixerConfig {
    pub poll_interval: Duration,
    pub widget_title: String,
    pub widget_size: [f32; 2],

    /// Foreground titles that pin the widget on top
    pub pin_titles: Vec<String>,

    pub change_detection: ChangeDetection,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            widget_title: WIDGET_TITLE.to_string(),
            widget_size: WIDGET_SIZE,
            pin_titles: vec![DESKTOP_SHELL_TITLE.to_string(), WIDGET_TITLE.to_string()],
            change_detection: ChangeDetection::Cardinality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_constants() {
        let config = MixerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(200));
        assert_eq!(config.widget_size, [270.0, 500.0]);
        assert_eq!(config.pin_titles, ["Program Manager", "Desktop Volumater"]);
        assert_eq!(config.change_detection, ChangeDetection::Cardinality);
    }
}
