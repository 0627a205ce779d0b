//! System tray icon management.
//!
//! The widget never appears in the taskbar or Alt+Tab, so the tray entry is
//! the only way to quit it.

use std::sync::mpsc::{channel, Receiver, Sender};
use thiserror::Error;
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};

/// Events from the system tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    Exit,
}

/// Tray service error types.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("Failed to create tray icon: {0}")]
    CreateFailed(String),

    #[error("Failed to load icon resource")]
    IconLoadFailed,

    #[error("Tray icon not initialized")]
    NotInitialized,

    #[error("Failed to create menu: {0}")]
    MenuFailed(String),
}

/// System tray manager.
pub struct TrayManager {
    tray_icon: Option<TrayIcon>,
    tooltip: String,
    event_sender: Sender<TrayEvent>,
    event_receiver: Receiver<TrayEvent>,
    exit_menu_id: Option<tray_icon::menu::MenuId>,
}

impl TrayManager {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            tray_icon: None,
            tooltip: String::new(),
            event_sender: sender,
            event_receiver: receiver,
            exit_menu_id: None,
        }
    }

    /// Create and show the tray icon.
    pub fn create(&mut self, tooltip: &str) -> Result<(), TrayError> {
        let menu = Menu::new();
        let exit_item = MenuItem::new("Exit", true, None);
        self.exit_menu_id = Some(exit_item.id().clone());
        menu.append(&exit_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(Self::create_icon()?)
            .with_tooltip(tooltip)
            .with_menu(Box::new(menu))
            .build()
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;

        self.tray_icon = Some(tray_icon);
        self.tooltip = tooltip.to_string();
        Ok(())
    }

    /// Translate pending menu events. Call this from the event loop.
    pub fn process_events(&self) {
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            if Some(&event.id) == self.exit_menu_id.as_ref() {
                let _ = self.event_sender.send(TrayEvent::Exit);
            }
        }
    }

    pub fn events(&self) -> &Receiver<TrayEvent> {
        &self.event_receiver
    }

    /// Update the tooltip text; unchanged text is not re-sent to the shell.
    pub fn set_tooltip(&mut self, text: &str) -> Result<(), TrayError> {
        if self.tooltip == text {
            return Ok(());
        }
        let tray = self.tray_icon.as_mut().ok_or(TrayError::NotInitialized)?;
        tray.set_tooltip(Some(text))
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;
        self.tooltip = text.to_string();
        Ok(())
    }

    /// Speaker-like glyph drawn into a 32x32 RGBA buffer.
    fn create_icon() -> Result<Icon, TrayError> {
        const SIZE: usize = 32;
        let mut rgba = vec![0u8; SIZE * SIZE * 4];

        for y in 0..SIZE {
            for x in 0..SIZE {
                let idx = (y * SIZE + x) * 4;
                let dy = (y as f32 - SIZE as f32 / 2.0).abs();

                // Speaker body on the left, widening cone to the right
                let body = (6..12).contains(&x) && dy < 5.0;
                let cone = (12..20).contains(&x) && dy < 5.0 + (x - 12) as f32;
                if body || cone {
                    rgba[idx] = 0;
                    rgba[idx + 1] = 120;
                    rgba[idx + 2] = 212;
                    rgba[idx + 3] = 255;
                }
            }
        }

        Icon::from_rgba(rgba, SIZE as u32, SIZE as u32).map_err(|_| TrayError::IconLoadFailed)
    }

    /// Remove the tray icon.
    pub fn destroy(&mut self) {
        self.tray_icon = None;
    }
}

impl Default for TrayManager {
    fn default() -> Self {
        Self::new()
    }
}
