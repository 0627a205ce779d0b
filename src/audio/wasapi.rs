//! Session enumeration using the Windows Core Audio session API.
//!
//! Provides COM initialization, per-application session enumeration for the
//! default render endpoint, session volume control and process name lookup.

use super::session::{AudioError, RawSession, SessionId, VolumeControl};
use super::source::{ProcessNames, SessionSource};
use std::path::Path;
use std::rc::Rc;
use windows::core::{Interface, PWSTR};
use windows::Win32::Foundation::{CloseHandle, ERROR_INSUFFICIENT_BUFFER, MAX_PATH, S_OK};
use windows::Win32::Media::Audio::{
    eMultimedia, eRender, IAudioSessionControl, IAudioSessionControl2, IAudioSessionManager2,
    IMMDeviceEnumerator, ISimpleAudioVolume, MMDeviceEnumerator,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_ALL,
    COINIT_APARTMENTTHREADED,
};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};

/// COM initialization guard that uninitializes COM on drop.
pub struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    /// Initialize COM for the current thread.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            // Use apartment-threaded for UI compatibility
            CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                .ok()
                .map_err(|e| AudioError::ComInitFailed(e.to_string()))?;
        }
        Ok(Self { initialized: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe {
                CoUninitialize();
            }
        }
    }
}

/// Session source backed by `IAudioSessionManager2`.
pub struct WasapiSessionSource {
    enumerator: IMMDeviceEnumerator,
    endpoint: Option<String>,
}

impl WasapiSessionSource {
    /// Create a new session source.
    ///
    /// Note: COM must be initialized before calling this function.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                    .map_err(|e| AudioError::Unavailable(e.to_string()))?;

            Ok(Self {
                enumerator,
                endpoint: None,
            })
        }
    }

    /// Activate the session manager of the current default render endpoint.
    ///
    /// Looked up on every poll so a changed default device is picked up; the
    /// endpoint id is recorded for [`SessionSource::endpoint_id`].
    fn session_manager(&mut self) -> Result<IAudioSessionManager2, AudioError> {
        unsafe {
            let device = self
                .enumerator
                .GetDefaultAudioEndpoint(eRender, eMultimedia)
                .map_err(|_| AudioError::NoDefaultDevice)?;
            self.endpoint = device.GetId().ok().and_then(|p| take_co_string(p));

            device
                .Activate::<IAudioSessionManager2>(CLSCTX_ALL, None)
                .map_err(|e| AudioError::Unavailable(e.to_string()))
        }
    }

    fn to_raw_session(control: &IAudioSessionControl) -> Result<RawSession, AudioError> {
        unsafe {
            let control2: IAudioSessionControl2 = control
                .cast()
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;
            let volume: ISimpleAudioVolume =
                control.cast().map_err(|_| AudioError::VolumeNotAvailable)?;

            let id = control2
                .GetSessionInstanceIdentifier()
                .ok()
                .and_then(|p| take_co_string(p))
                .unwrap_or_default();
            let display_name = control
                .GetDisplayName()
                .ok()
                .and_then(|p| take_co_string(p))
                .unwrap_or_default();
            let is_system_sounds = control2.IsSystemSoundsSession() == S_OK;
            let process_id = control2.GetProcessId().unwrap_or(0);

            Ok(RawSession {
                id: SessionId(id),
                display_name,
                is_system_sounds,
                process_id,
                volume: Rc::new(SimpleVolume { control: volume }),
            })
        }
    }
}

impl SessionSource for WasapiSessionSource {
    fn enumerate(&mut self) -> Result<Vec<RawSession>, AudioError> {
        unsafe {
            // A fresh session enumerator is a fresh snapshot of the session list.
            let sessions = self
                .session_manager()?
                .GetSessionEnumerator()
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;

            let count = sessions
                .GetCount()
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;

            let mut raw_sessions = Vec::with_capacity(count.max(0) as usize);
            for i in 0..count {
                let control = sessions
                    .GetSession(i)
                    .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;
                raw_sessions.push(Self::to_raw_session(&control)?);
            }

            Ok(raw_sessions)
        }
    }

    fn endpoint_id(&self) -> Option<String> {
        self.endpoint.clone()
    }
}

/// Copy a COM-allocated wide string and free it.
unsafe fn take_co_string(p: PWSTR) -> Option<String> {
    if p.is_null() {
        return None;
    }
    let s = p.to_string().ok();
    CoTaskMemFree(Some(p.0 as *const _));
    s
}

/// Volume control for a single session (`ISimpleAudioVolume`).
pub struct SimpleVolume {
    control: ISimpleAudioVolume,
}

impl VolumeControl for SimpleVolume {
    fn volume(&self) -> Result<f32, AudioError> {
        unsafe {
            self.control
                .GetMasterVolume()
                .map_err(|e| AudioError::VolumeReadFailed(e.to_string()))
        }
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        let level = level.clamp(0.0, 1.0);
        unsafe {
            self.control
                .SetMasterVolume(level, std::ptr::null())
                .map_err(|e| AudioError::VolumeWriteFailed(e.to_string()))
        }
    }
}

/// Process name lookup via `QueryFullProcessImageNameW`.
///
/// Returns the executable file stem, e.g. `Spotify` for `C:\...\Spotify.exe`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32ProcessNames;

impl ProcessNames for Win32ProcessNames {
    fn process_name(&self, process_id: u32) -> Option<String> {
        if process_id == 0 {
            return None;
        }

        let full_path = unsafe {
            let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id).ok()?;
            let path = read_growing(|buffer| {
                let mut size = buffer.len() as u32;
                match QueryFullProcessImageNameW(
                    handle,
                    PROCESS_NAME_WIN32,
                    PWSTR(buffer.as_mut_ptr()),
                    &mut size,
                ) {
                    Ok(()) => Ok(size as usize),
                    Err(e) if e.code() == ERROR_INSUFFICIENT_BUFFER.to_hresult() => {
                        Err(Read::TooSmall)
                    }
                    Err(_) => Err(Read::Failed),
                }
            });
            let _ = CloseHandle(handle);
            path?
        };

        Path::new(&full_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
    }
}

/// Longest path the extended-length Win32 APIs can report, in UTF-16 units.
const MAX_LONG_PATH: usize = 32_768;

enum Read {
    TooSmall,
    Failed,
}

/// Fill a wide-string buffer, starting at `MAX_PATH` and doubling while the
/// callee reports it too small. `read` returns the number of units written.
fn read_growing(mut read: impl FnMut(&mut [u16]) -> Result<usize, Read>) -> Option<String> {
    let mut capacity = MAX_PATH as usize;
    loop {
        let mut buffer = vec![0u16; capacity];
        match read(&mut buffer) {
            Ok(len) => return Some(String::from_utf16_lossy(&buffer[..len.min(capacity)])),
            Err(Read::TooSmall) if capacity < MAX_LONG_PATH => {
                capacity = (capacity * 2).min(MAX_LONG_PATH);
            }
            Err(_) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn long_image_path_grows_past_max_path() {
        let long_path = format!(r"C:\{}\Spotify.exe", "nested\\".repeat(60));
        let expected = wide(&long_path);
        assert!(expected.len() > MAX_PATH as usize);

        let mut attempts = 0;
        let path = read_growing(|buffer| {
            attempts += 1;
            if buffer.len() < expected.len() {
                return Err(Read::TooSmall);
            }
            buffer[..expected.len()].copy_from_slice(&expected);
            Ok(expected.len())
        });

        assert_eq!(path.as_deref(), Some(long_path.as_str()));
        assert!(attempts > 1);
    }

    #[test]
    fn hard_failure_stops_without_retrying() {
        let mut attempts = 0;
        let path = read_growing(|_| {
            attempts += 1;
            Err(Read::Failed)
        });
        assert_eq!(path, None);
        assert_eq!(attempts, 1);
    }

    #[test]
    fn growth_is_capped() {
        let mut largest = 0;
        let path = read_growing(|buffer| {
            largest = largest.max(buffer.len());
            Err(Read::TooSmall)
        });
        assert_eq!(path, None);
        assert_eq!(largest, MAX_LONG_PATH);
    }

    #[test]
    fn current_process_name_resolves() {
        let name = Win32ProcessNames.process_name(std::process::id());
        assert!(name.is_some_and(|n| !n.is_empty()));
    }

    #[test]
    fn default_endpoint_sessions_enumerate_under_com() {
        let _com = ComGuard::new().unwrap();
        let mut source = WasapiSessionSource::new().unwrap();
        // Machines without an output device report NoDefaultDevice.
        match source.enumerate() {
            Ok(_) => assert!(source.endpoint_id().is_some()),
            Err(e) => assert!(matches!(e, AudioError::NoDefaultDevice), "{e}"),
        }
    }
}
