//! Widget application state and lifecycle.
//!
//! Owns the control loops and drives them from the eframe update loop.

use crate::audio::wasapi::{WasapiSessionSource, Win32ProcessNames};
use crate::audio::{AudioError, SessionRegistry};
use crate::config::MixerConfig;
use crate::presentation::MixerView;
use crate::scheduler::TickScheduler;
use crate::ui::{MixerPanel, Theme, TrayEvent, TrayManager};
use crate::window::win32::{Win32Monitor, Win32Placement};
use crate::window::VisibilityController;
use eframe::egui;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Main application state.
pub struct MixerApp {
    config: MixerConfig,
    scheduler: TickScheduler,
    registry: SessionRegistry<WasapiSessionSource>,
    visibility: VisibilityController<Win32Monitor>,
    view: MixerView,
    panel: MixerPanel,
    tray: TrayManager,
}

impl MixerApp {
    /// Build the app once the native window context exists.
    ///
    /// COM must be initialized on this thread.
    pub fn new(cc: &eframe::CreationContext<'_>, config: MixerConfig) -> Result<Self, AudioError> {
        let panel = MixerPanel::new(Theme::dark());
        panel.theme().apply(&cc.egui_ctx);

        let registry = SessionRegistry::new(
            WasapiSessionSource::new()?,
            Box::new(Win32ProcessNames),
            config.change_detection,
        );
        let visibility = VisibilityController::new(Win32Monitor, config.pin_titles.clone());

        let mut tray = TrayManager::new();
        if let Err(e) = tray.create(&config.widget_title) {
            warn!(error = %e, "tray icon unavailable");
        }

        info!(
            interval_ms = config.poll_interval.as_millis() as u64,
            detection = ?config.change_detection,
            "mixer started"
        );

        Ok(Self {
            scheduler: TickScheduler::new(config.poll_interval),
            config,
            registry,
            visibility,
            view: MixerView::new(),
            panel,
            tray,
        })
    }

    /// Hand the native widget window to the visibility controller.
    ///
    /// The window is not findable until winit has created it, so this is
    /// retried every frame until it succeeds.
    fn attach_window(&mut self) {
        if self.visibility.is_attached() {
            return;
        }
        match Win32Placement::find(&self.config.widget_title) {
            Ok(placement) => self.visibility.attach(Box::new(placement)),
            Err(e) => debug!(error = %e, "widget window not ready"),
        }
    }

    fn handle_tray_events(&mut self, ctx: &egui::Context) {
        self.tray.process_events();
        while let Ok(event) = self.tray.events().try_recv() {
            match event {
                TrayEvent::Exit => {
                    info!("exit requested from tray");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }
}

impl eframe::App for MixerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_tray_events(ctx);
        self.attach_window();

        let ticked = self
            .scheduler
            .poll(
                Instant::now(),
                &mut self.visibility,
                &mut self.registry,
                &mut self.view,
            )
            .is_some();
        if ticked {
            self.view.sync_levels();
            let tooltip = self.view.tooltip(&self.config.widget_title);
            if let Err(e) = self.tray.set_tooltip(&tooltip) {
                debug!(error = %e, "tray tooltip not updated");
            }
        }

        self.panel.show(ctx, &mut self.view);

        ctx.request_repaint_after(self.scheduler.cadence().time_until_due(Instant::now()));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!(ticks = self.scheduler.ticks(), "mixer shutting down");
        self.tray.destroy();
    }
}
