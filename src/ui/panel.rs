//! Mixer panel rendering using eframe/egui.

use crate::presentation::{MixerContent, MixerView};
use crate::ui::components::SessionRow;
use crate::ui::theme::Theme;
use eframe::egui::{self, RichText};
use tracing::debug;

/// Spacing between session rows.
const ROW_SPACING: f32 = 10.0;

/// The widget's single panel.
pub struct MixerPanel {
    theme: Theme,
}

impl MixerPanel {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render the current view; slider drags write through the row bindings.
    pub fn show(&self, ctx: &egui::Context, view: &mut MixerView) {
        egui::CentralPanel::default().show(ctx, |ui| {
            match view.content() {
                MixerContent::Pending => return,
                MixerContent::Empty => {
                    ui.label(
                        RichText::new(view.message().unwrap_or_default())
                            .color(self.theme.text_secondary),
                    );
                    return;
                }
                MixerContent::Error(message) => {
                    ui.colored_label(self.theme.error, message);
                    return;
                }
                MixerContent::Rows(_) => {}
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for row in view.rows_mut() {
                        if let Some(percent) = SessionRow::show(ui, row, &self.theme) {
                            debug!(label = %row.label(), percent, "volume changed");
                        }
                        ui.add_space(ROW_SPACING);
                    }
                });
        });
    }
}
