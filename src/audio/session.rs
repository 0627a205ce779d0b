//! Audio session data models.
//!
//! Defines the per-application sessions rendered through the default output
//! device, the snapshot the registry hands to the presentation layer, and the
//! error type shared by every audio backend.

use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Opaque session identity reported by the audio subsystem.
///
/// Only meaningful within one poll; it is re-fetched on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of stream a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// The shared "system sounds" stream (notifications, UI sounds)
    SystemSounds,

    /// A stream owned by an ordinary application process
    ProcessBacked { process_id: u32 },
}

/// A live volume control owned by the audio subsystem.
///
/// The OS is authoritative for the level; implementations read and write it
/// straight through.
pub trait VolumeControl {
    /// Get the current volume level (0.0 to 1.0).
    fn volume(&self) -> Result<f32, AudioError>;

    /// Set the volume level (0.0 to 1.0).
    fn set_volume(&self, level: f32) -> Result<(), AudioError>;
}

/// A session as enumerated by a [`SessionSource`](super::SessionSource),
/// before its label has been resolved.
#[derive(Clone)]
pub struct RawSession {
    /// Session instance identifier
    pub id: SessionId,

    /// Display name set by the application (often empty)
    pub display_name: String,

    /// Whether this is the system sounds session
    pub is_system_sounds: bool,

    /// Owning process id (0 for the system sounds session)
    pub process_id: u32,

    /// Live volume control for this session
    pub volume: Rc<dyn VolumeControl>,
}

impl RawSession {
    /// Session kind derived from the system sounds flag.
    pub fn kind(&self) -> SessionKind {
        if self.is_system_sounds {
            SessionKind::SystemSounds
        } else {
            SessionKind::ProcessBacked {
                process_id: self.process_id,
            }
        }
    }
}

impl fmt::Debug for RawSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSession")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("is_system_sounds", &self.is_system_sounds)
            .field("process_id", &self.process_id)
            .finish_non_exhaustive()
    }
}

/// A labelled audio session, owned by the registry for one snapshot.
#[derive(Clone)]
pub struct AudioSession {
    id: SessionId,
    kind: SessionKind,
    label: String,
    volume_level: f32,
    control: Rc<dyn VolumeControl>,
}

impl AudioSession {
    /// Create a session from its resolved label and the level read at rebuild time.
    pub fn new(
        id: SessionId,
        kind: SessionKind,
        label: String,
        volume_level: f32,
        control: Rc<dyn VolumeControl>,
    ) -> Self {
        Self {
            id,
            kind,
            label,
            volume_level: volume_level.clamp(0.0, 1.0),
            control,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Owning process id, if the session is process backed.
    pub fn process_id(&self) -> Option<u32> {
        match self.kind {
            SessionKind::ProcessBacked { process_id } => Some(process_id),
            SessionKind::SystemSounds => None,
        }
    }

    /// Human-readable label shown in the mixer.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Volume level (0.0 to 1.0) as read when the snapshot was built.
    pub fn volume_level(&self) -> f32 {
        self.volume_level
    }

    /// Volume as percentage (0-100).
    pub fn volume_percent(&self) -> u8 {
        (self.volume_level * 100.0).round() as u8
    }

    /// Shared handle to the live volume control.
    pub fn control(&self) -> Rc<dyn VolumeControl> {
        Rc::clone(&self.control)
    }
}

impl fmt::Debug for AudioSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSession")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("volume_level", &self.volume_level)
            .finish_non_exhaustive()
    }
}

/// The complete, ordered list of sessions produced by one poll.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    sessions: Vec<AudioSession>,
}

impl SessionSnapshot {
    pub fn new(sessions: Vec<AudioSession>) -> Self {
        Self { sessions }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn sessions(&self) -> &[AudioSession] {
        &self.sessions
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioSession> {
        self.sessions.iter()
    }
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audio subsystem unavailable: {0}")]
    Unavailable(String),

    #[error("No default output device available")]
    NoDefaultDevice,

    #[error("COM initialization failed: {0}")]
    ComInitFailed(String),

    #[error("Failed to enumerate audio sessions: {0}")]
    EnumerationFailed(String),

    #[error("Volume control not available for session")]
    VolumeNotAvailable,

    #[error("Failed to read session volume: {0}")]
    VolumeReadFailed(String),

    #[error("Failed to set session volume: {0}")]
    VolumeWriteFailed(String),
}
