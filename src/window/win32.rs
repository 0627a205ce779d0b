//! Win32 implementations of the window seams.

use super::monitor::{title_from_buffer, ForegroundMonitor, ForegroundWindow, WindowId, TITLE_CAPACITY};
use super::visibility::{WindowError, WindowPlacement};
use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, GetForegroundWindow, GetWindowLongW, GetWindowTextW, SetWindowLongW,
    SetWindowPos, GWL_EXSTYLE, HWND_BOTTOM, HWND_NOTOPMOST, HWND_TOPMOST, SWP_NOACTIVATE,
    SWP_NOMOVE, SWP_NOSIZE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Foreground monitor using `GetForegroundWindow` and `GetWindowTextW`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Monitor;

impl ForegroundMonitor for Win32Monitor {
    fn current_foreground(&self) -> ForegroundWindow {
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.is_invalid() {
                return ForegroundWindow::default();
            }

            let mut buffer = [0u16; TITLE_CAPACITY];
            let len = GetWindowTextW(hwnd, &mut buffer);

            ForegroundWindow {
                id: Some(WindowId(hwnd.0 as isize)),
                title: title_from_buffer(&buffer, len),
            }
        }
    }
}

/// Placement of the widget's top-level window.
pub struct Win32Placement {
    hwnd: HWND,
}

impl Win32Placement {
    /// Find the top-level window with the given title.
    pub fn find(title: &str) -> Result<Self, WindowError> {
        let title_wide = to_wide(title);
        let hwnd = unsafe { FindWindowW(PCWSTR::null(), PCWSTR(title_wide.as_ptr())) }
            .map_err(|_| WindowError::NotFound {
                title: title.to_string(),
            })?;

        if hwnd.is_invalid() {
            return Err(WindowError::NotFound {
                title: title.to_string(),
            });
        }
        Ok(Self { hwnd })
    }

    fn is_topmost(&self) -> bool {
        unsafe { (GetWindowLongW(self.hwnd, GWL_EXSTYLE) & WS_EX_TOPMOST.0 as i32) != 0 }
    }

    fn reposition(&self, insert_after: HWND) -> Result<(), WindowError> {
        unsafe {
            SetWindowPos(
                self.hwnd,
                insert_after,
                0,
                0,
                0,
                0,
                SWP_NOSIZE | SWP_NOMOVE | SWP_NOACTIVATE,
            )
            .map_err(|e| WindowError::PlacementFailed(e.to_string()))
        }
    }
}

impl WindowPlacement for Win32Placement {
    fn id(&self) -> WindowId {
        WindowId(self.hwnd.0 as isize)
    }

    fn hide_from_task_switcher(&self) -> Result<(), WindowError> {
        unsafe {
            let ex_style = GetWindowLongW(self.hwnd, GWL_EXSTYLE);
            let previous =
                SetWindowLongW(self.hwnd, GWL_EXSTYLE, ex_style | WS_EX_TOOLWINDOW.0 as i32);
            if previous == 0 && ex_style != 0 {
                return Err(WindowError::StyleFailed(
                    windows::core::Error::from_win32().to_string(),
                ));
            }
        }
        Ok(())
    }

    fn set_always_on_top(&self, on_top: bool) -> Result<(), WindowError> {
        // HWND_NOTOPMOST raises the window, so only issue it when actually topmost.
        if !on_top && !self.is_topmost() {
            return Ok(());
        }
        self.reposition(if on_top { HWND_TOPMOST } else { HWND_NOTOPMOST })
    }

    fn send_to_bottom(&self) -> Result<(), WindowError> {
        self.reposition(HWND_BOTTOM)
    }
}
