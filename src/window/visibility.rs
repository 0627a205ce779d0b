//! Widget stacking control.
//!
//! Keeps the mixer pinned above everything while the desktop (or the mixer
//! itself) has focus, so "Show Desktop" cannot hide it, and pushes it to the
//! bottom of the z-order the rest of the time.

use super::monitor::{ForegroundMonitor, ForegroundWindow, WindowId};
use thiserror::Error;
use tracing::{debug, warn};

/// Stacking state of the widget window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetVisibility {
    /// Always-on-top
    Pinned,

    /// Bottom of the z-order, never activated
    Recessed,
}

/// Window service error types.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Window not found: {title}")]
    NotFound { title: String },

    #[error("Failed to update window style: {0}")]
    StyleFailed(String),

    #[error("Failed to reposition window: {0}")]
    PlacementFailed(String),
}

/// Operations the controller needs on the widget window.
pub trait WindowPlacement {
    /// Handle of the widget window.
    fn id(&self) -> WindowId;

    /// Exclude the window from the taskbar and Alt+Tab.
    fn hide_from_task_switcher(&self) -> Result<(), WindowError>;

    fn set_always_on_top(&self, on_top: bool) -> Result<(), WindowError>;

    /// Move to the bottom of the z-order without resizing, moving or activating.
    fn send_to_bottom(&self) -> Result<(), WindowError>;
}

/// Drives the widget between [`WidgetVisibility::Pinned`] and
/// [`WidgetVisibility::Recessed`] from the focused window.
pub struct VisibilityController<M: ForegroundMonitor> {
    monitor: M,
    pin_titles: Vec<String>,
    placement: Option<Box<dyn WindowPlacement>>,
    state: Option<WidgetVisibility>,
}

impl<M: ForegroundMonitor> VisibilityController<M> {
    /// `pin_titles` are the foreground titles that pin the widget: the desktop
    /// shell and the widget's own title.
    pub fn new(monitor: M, pin_titles: Vec<String>) -> Self {
        Self {
            monitor,
            pin_titles,
            placement: None,
            state: None,
        }
    }

    /// Take control of the widget window once it exists.
    pub fn attach(&mut self, placement: Box<dyn WindowPlacement>) {
        if let Err(e) = placement.hide_from_task_switcher() {
            warn!(error = %e, "could not hide widget from task switcher");
        }
        debug!(window = ?placement.id(), "visibility controller attached");
        self.placement = Some(placement);
    }

    pub fn is_attached(&self) -> bool {
        self.placement.is_some()
    }

    /// State applied by the last evaluation; `None` before the first tick.
    pub fn state(&self) -> Option<WidgetVisibility> {
        self.state
    }

    /// Decide the target state for a foreground window.
    pub fn classify(&self, foreground: &ForegroundWindow) -> WidgetVisibility {
        let own_window = match (&self.placement, foreground.id) {
            (Some(placement), Some(id)) => placement.id() == id,
            _ => false,
        };

        if own_window || self.pin_titles.iter().any(|t| *t == foreground.title) {
            WidgetVisibility::Pinned
        } else {
            WidgetVisibility::Recessed
        }
    }

    /// Query the foreground window and apply the matching state.
    ///
    /// Applied on every call, not only on transitions.
    pub fn evaluate(&mut self) -> WidgetVisibility {
        let foreground = self.monitor.current_foreground();
        let target = self.classify(&foreground);

        if self.state != Some(target) {
            debug!(title = %foreground.title, state = ?target, "widget visibility changed");
        }

        if let Some(placement) = &self.placement {
            if let Err(e) = Self::apply(placement.as_ref(), target) {
                warn!(error = %e, state = ?target, "failed to apply widget visibility");
            }
        }

        self.state = Some(target);
        target
    }

    fn apply(placement: &dyn WindowPlacement, target: WidgetVisibility) -> Result<(), WindowError> {
        match target {
            WidgetVisibility::Pinned => placement.set_always_on_top(true),
            WidgetVisibility::Recessed => {
                placement.set_always_on_top(false)?;
                placement.send_to_bottom()
            }
        }
    }

    pub fn monitor(&self) -> &M {
        &self.monitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::fake::{FakeMonitor, FakePlacement, PlacementCall};

    const DESKTOP: &str = "Program Manager";
    const SELF_TITLE: &str = "Desktop Volumater";

    fn controller(monitor: FakeMonitor) -> VisibilityController<FakeMonitor> {
        VisibilityController::new(monitor, vec![DESKTOP.into(), SELF_TITLE.into()])
    }

    #[test]
    fn desktop_and_own_title_pin() {
        for title in [DESKTOP, SELF_TITLE] {
            let (placement, calls) = FakePlacement::new(1);
            let mut controller = controller(FakeMonitor::titled(99, title));
            controller.attach(Box::new(placement));
            calls.borrow_mut().clear();

            assert_eq!(controller.evaluate(), WidgetVisibility::Pinned);
            assert_eq!(*calls.borrow(), [PlacementCall::AlwaysOnTop(true)]);
        }
    }

    #[test]
    fn other_titles_recess_to_bottom() {
        let (placement, calls) = FakePlacement::new(1);
        let mut controller = controller(FakeMonitor::titled(99, "Untitled - Notepad"));
        controller.attach(Box::new(placement));
        calls.borrow_mut().clear();

        assert_eq!(controller.evaluate(), WidgetVisibility::Recessed);
        assert_eq!(
            *calls.borrow(),
            [PlacementCall::AlwaysOnTop(false), PlacementCall::SendToBottom]
        );
    }

    #[test]
    fn state_is_reapplied_every_tick() {
        let (placement, calls) = FakePlacement::new(1);
        let mut controller = controller(FakeMonitor::titled(99, "Browser"));
        controller.attach(Box::new(placement));
        calls.borrow_mut().clear();

        for _ in 0..3 {
            controller.evaluate();
        }
        let bottoms = calls
            .borrow()
            .iter()
            .filter(|c| **c == PlacementCall::SendToBottom)
            .count();
        assert_eq!(bottoms, 3);
    }

    #[test]
    fn own_window_pins_even_when_title_differs() {
        let (placement, _calls) = FakePlacement::new(42);
        let mut controller = controller(FakeMonitor::titled(42, "Volume Mixer v2"));
        controller.attach(Box::new(placement));
        assert_eq!(controller.evaluate(), WidgetVisibility::Pinned);
    }

    #[test]
    fn attach_hides_from_task_switcher() {
        let (placement, calls) = FakePlacement::new(1);
        let mut controller = controller(FakeMonitor::titled(2, "x"));
        controller.attach(Box::new(placement));
        assert_eq!(*calls.borrow(), [PlacementCall::HideFromTaskSwitcher]);
    }

    #[test]
    fn unattached_controller_still_tracks_state() {
        let mut controller = controller(FakeMonitor::titled(2, DESKTOP));
        assert_eq!(controller.state(), None);
        assert_eq!(controller.evaluate(), WidgetVisibility::Pinned);
        assert_eq!(controller.state(), Some(WidgetVisibility::Pinned));
    }

    #[test]
    fn title_follows_monitor_between_ticks() {
        let monitor = FakeMonitor::titled(2, DESKTOP);
        let mut controller = controller(monitor.clone());
        assert_eq!(controller.evaluate(), WidgetVisibility::Pinned);
        monitor.set_title("Terminal");
        assert_eq!(controller.evaluate(), WidgetVisibility::Recessed);
    }

    #[test]
    fn placement_failure_does_not_stop_evaluation() {
        let (placement, _calls) = FakePlacement::failing(1);
        let mut controller = controller(FakeMonitor::titled(2, "Terminal"));
        controller.attach(Box::new(placement));
        assert_eq!(controller.evaluate(), WidgetVisibility::Recessed);
    }
}
