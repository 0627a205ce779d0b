//! Two-way binding between a mixer row and a session's live volume.
//!
//! The row shows an integer percentage; the OS control holds a scalar in
//! 0.0..=1.0. Writes go straight through with no debouncing.

use super::session::{AudioSession, VolumeControl};
use std::rc::Rc;
use tracing::warn;

/// Convert a display percentage to a volume scalar.
pub fn percent_to_level(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

/// Convert a volume scalar to the nearest display percentage.
pub fn level_to_percent(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Binding for one session row.
pub struct VolumeBinding {
    label: String,
    control: Rc<dyn VolumeControl>,
    percent: u8,
    failed: bool,
}

impl VolumeBinding {
    /// Bind to a session using the level captured in its snapshot.
    pub fn new(session: &AudioSession) -> Self {
        Self {
            label: session.label().to_string(),
            control: session.control(),
            percent: session.volume_percent(),
            failed: false,
        }
    }

    /// Write a new percentage to the live control.
    ///
    /// A failed write (the session ended mid-drag) only annotates this row.
    pub fn set_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        match self.control.set_volume(percent_to_level(percent)) {
            Ok(()) => {
                self.percent = percent;
                self.failed = false;
            }
            Err(e) => {
                warn!(label = %self.label, error = %e, "volume set error");
                self.failed = true;
            }
        }
    }

    /// Read the live level, rounded to the nearest percent.
    ///
    /// Falls back to the last displayed value if the control cannot be read.
    /// A successful read clears an earlier failure annotation.
    pub fn current_percent(&mut self) -> u8 {
        match self.control.volume() {
            Ok(level) => {
                self.percent = level_to_percent(level);
                self.failed = false;
            }
            Err(e) => {
                if !self.failed {
                    warn!(label = %self.label, error = %e, "volume read error");
                }
                self.failed = true;
            }
        }
        self.percent
    }

    /// Percentage as last written or read, without touching the OS.
    pub fn displayed_percent(&self) -> u8 {
        self.percent
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True once a read or write against the control has failed.
    pub fn has_error(&self) -> bool {
        self.failed
    }

    /// Text shown above the slider, e.g. `Spotify (40%)` or `Spotify (Error)`.
    pub fn row_text(&self) -> String {
        if self.failed {
            format!("{} (Error)", self.label)
        } else {
            format!("{} ({}%)", self.label, self.percent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::session::{SessionId, SessionKind};
    use crate::audio::source::fake::FakeVolume;

    fn bound(level: f32) -> (Rc<FakeVolume>, VolumeBinding) {
        let volume = FakeVolume::shared(level);
        let session = AudioSession::new(
            SessionId("s".into()),
            SessionKind::ProcessBacked { process_id: 5 },
            "Spotify".into(),
            level,
            volume.clone(),
        );
        (volume, VolumeBinding::new(&session))
    }

    #[test]
    fn set_then_read_round_trips() {
        let (volume, mut binding) = bound(0.2);
        binding.set_volume(50);
        assert!((volume.level() - 0.5).abs() < f32::EPSILON);
        assert_eq!(binding.current_percent(), 50);
        assert_eq!(binding.row_text(), "Spotify (50%)");
    }

    #[test]
    fn every_percent_survives_the_scalar_round_trip() {
        for percent in 0..=100u8 {
            assert_eq!(level_to_percent(percent_to_level(percent)), percent);
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let (volume, mut binding) = bound(0.2);
        binding.set_volume(250);
        assert_eq!(volume.level(), 1.0);
        assert_eq!(level_to_percent(-0.3), 0);
    }

    #[test]
    fn external_changes_show_on_next_read() {
        let (volume, mut binding) = bound(0.2);
        volume.set_external(0.734);
        assert_eq!(binding.current_percent(), 73);
    }

    #[test]
    fn failed_write_annotates_row_and_keeps_last_value() {
        let (volume, mut binding) = bound(0.4);
        volume.fail();
        binding.set_volume(90);
        assert!(binding.has_error());
        assert_eq!(binding.displayed_percent(), 40);
        assert_eq!(binding.row_text(), "Spotify (Error)");
        assert_eq!(binding.current_percent(), 40);
    }

    #[test]
    fn transient_read_failure_clears_once_control_answers_again() {
        let (volume, mut binding) = bound(0.4);
        volume.fail();
        assert_eq!(binding.current_percent(), 40);
        assert_eq!(binding.row_text(), "Spotify (Error)");

        volume.recover();
        volume.set_external(0.6);
        assert_eq!(binding.current_percent(), 60);
        assert!(!binding.has_error());
        assert_eq!(binding.row_text(), "Spotify (60%)");
    }
}
