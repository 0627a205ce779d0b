//! Seams between the registry and the platform audio subsystem.

use super::session::{AudioError, RawSession};

/// Enumerates the sessions of the default render endpoint.
///
/// Every call must re-query the subsystem; implementations never return a
/// cached collection.
pub trait SessionSource {
    fn enumerate(&mut self) -> Result<Vec<RawSession>, AudioError>;

    /// Id of the endpoint the last `enumerate` call read from.
    ///
    /// Session handles from one endpoint are useless once the default device
    /// changes. `None` means the source only ever reads one endpoint.
    fn endpoint_id(&self) -> Option<String> {
        None
    }
}

/// Resolves a process id to its executable name.
pub trait ProcessNames {
    /// Returns `None` when the process has exited or cannot be opened.
    fn process_name(&self, process_id: u32) -> Option<String>;
}

impl<F> ProcessNames for F
where
    F: Fn(u32) -> Option<String>,
{
    fn process_name(&self, process_id: u32) -> Option<String> {
        self(process_id)
    }
}
