//! Foreground window queries.

/// Title buffer length in UTF-16 units. Longer titles are truncated.
pub const TITLE_CAPACITY: usize = 256;

/// Opaque native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub isize);

/// The window currently holding input focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForegroundWindow {
    /// `None` when no window has focus
    pub id: Option<WindowId>,
    pub title: String,
}

/// Stateless query for the focused window, executed once per tick.
pub trait ForegroundMonitor {
    fn current_foreground(&self) -> ForegroundWindow;

    fn current_foreground_title(&self) -> String {
        self.current_foreground().title
    }
}

/// Decode the first `len` units of a title buffer.
///
/// `len` is clamped to the buffer; invalid UTF-16 is replaced rather than
/// rejected.
pub fn title_from_buffer(buffer: &[u16], len: i32) -> String {
    let len = usize::try_from(len).unwrap_or(0).min(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}
