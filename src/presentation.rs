//! View model between the registry and the widget UI.

use crate::audio::{RefreshOutcome, VolumeBinding};
use tracing::debug;

/// Text shown when the endpoint has no sessions.
pub const EMPTY_PLACEHOLDER: &str = "No active audio sessions.";

/// Receives registry results that need a visible update.
pub trait Presenter {
    /// Called for `Rebuilt` and `Error`; never for `NoChange`.
    fn present(&mut self, outcome: &RefreshOutcome);
}

/// What the mixer panel currently shows.
pub enum MixerContent {
    /// Nothing has been presented yet
    Pending,

    /// One row per session, in enumeration order
    Rows(Vec<VolumeBinding>),

    /// The endpoint has no sessions
    Empty,

    /// Enumeration failed; holds the full message line
    Error(String),
}

/// Mixer panel state, rebuilt wholesale on every presented outcome.
pub struct MixerView {
    content: MixerContent,
    rebuilds: u64,
}

impl Default for MixerView {
    fn default() -> Self {
        Self::new()
    }
}

impl MixerView {
    pub fn new() -> Self {
        Self {
            content: MixerContent::Pending,
            rebuilds: 0,
        }
    }

    pub fn content(&self) -> &MixerContent {
        &self.content
    }

    /// Row bindings, empty unless sessions are shown.
    pub fn rows(&self) -> &[VolumeBinding] {
        match &self.content {
            MixerContent::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn rows_mut(&mut self) -> &mut [VolumeBinding] {
        match &mut self.content {
            MixerContent::Rows(rows) => rows,
            _ => &mut [],
        }
    }

    /// Number of sessions shown.
    pub fn session_count(&self) -> usize {
        self.rows().len()
    }

    /// Number of times the content was replaced.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Status line for the placeholder or error state, if any.
    pub fn message(&self) -> Option<&str> {
        match &self.content {
            MixerContent::Empty => Some(EMPTY_PLACEHOLDER),
            MixerContent::Error(message) => Some(message),
            MixerContent::Pending | MixerContent::Rows(_) => None,
        }
    }

    /// Re-read every row's live level so sliders follow changes made elsewhere.
    pub fn sync_levels(&mut self) {
        for row in self.rows_mut() {
            row.current_percent();
        }
    }

    /// Tray tooltip summarising the panel.
    pub fn tooltip(&self, title: &str) -> String {
        match (&self.content, self.session_count()) {
            (MixerContent::Pending, _) => title.to_string(),
            (MixerContent::Error(_), _) => format!("{title} - error"),
            (_, 1) => format!("{title} - 1 session"),
            (_, count) => format!("{title} - {count} sessions"),
        }
    }
}

impl Presenter for MixerView {
    fn present(&mut self, outcome: &RefreshOutcome) {
        self.content = match outcome {
            RefreshOutcome::NoChange => return,
            RefreshOutcome::Rebuilt(snapshot) if snapshot.is_empty() => MixerContent::Empty,
            RefreshOutcome::Rebuilt(snapshot) => {
                MixerContent::Rows(snapshot.iter().map(VolumeBinding::new).collect())
            }
            RefreshOutcome::Error(message) => {
                MixerContent::Error(format!("Error loading sessions: {message}"))
            }
        };
        self.rebuilds += 1;
        debug!(rows = self.session_count(), rebuilds = self.rebuilds, "mixer view rebuilt");
    }
}
