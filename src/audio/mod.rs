//! Audio module for Windows Core Audio session interactions.
//!
//! This module provides per-application session enumeration, label
//! resolution, the session registry and live volume bindings.

pub mod label;
pub mod registry;
pub mod session;
pub mod source;
pub mod volume;
#[cfg(windows)]
pub mod wasapi;

pub use label::{LabelResolver, SYSTEM_SOUNDS_LABEL};
pub use registry::{ChangeDetection, RefreshOutcome, SessionRegistry};
pub use session::{
    AudioError, AudioSession, RawSession, SessionId, SessionKind, SessionSnapshot, VolumeControl,
};
pub use source::{ProcessNames, SessionSource};
pub use volume::VolumeBinding;
