//! Display labels for audio sessions.

use super::session::RawSession;
use super::source::ProcessNames;

/// Label used for the shared system sounds session.
pub const SYSTEM_SOUNDS_LABEL: &str = "System Sounds";

/// Maps a raw session to the label shown in the mixer.
///
/// Resolution order:
/// 1. the system sounds session is always "System Sounds"
/// 2. a non-blank display name set by the application is used verbatim
/// 3. the owning process's executable name
/// 4. `PID {process_id}` when the process cannot be resolved
pub struct LabelResolver {
    process_names: Box<dyn ProcessNames>,
}

impl LabelResolver {
    pub fn new(process_names: Box<dyn ProcessNames>) -> Self {
        Self { process_names }
    }

    pub fn resolve(&self, session: &RawSession) -> String {
        if session.is_system_sounds {
            return SYSTEM_SOUNDS_LABEL.to_string();
        }

        if !session.display_name.trim().is_empty() {
            return session.display_name.clone();
        }

        match self.process_names.process_name(session.process_id) {
            Some(name) => name,
            None => {
                tracing::debug!(pid = session.process_id, "process name unavailable");
                format!("PID {}", session.process_id)
            }
        }
    }
}
