//! One mixer row: label with percentage above a 0-100 slider.

use crate::audio::VolumeBinding;
use crate::ui::theme::Theme;
use eframe::egui::{self, RichText, SliderClamping};

/// Label text size.
const LABEL_SIZE: f32 = 16.0;

/// Slider width in logical pixels.
const SLIDER_WIDTH: f32 = 200.0;

/// Session row component.
pub struct SessionRow;

impl SessionRow {
    /// Render a row and forward slider drags to the binding.
    ///
    /// Returns the new percentage if the slider moved.
    pub fn show(ui: &mut egui::Ui, binding: &mut VolumeBinding, theme: &Theme) -> Option<u8> {
        let color = if binding.has_error() {
            theme.error
        } else {
            theme.text_primary
        };
        let mut percent = binding.displayed_percent();

        let response = ui
            .vertical(|ui| {
                ui.label(RichText::new(binding.row_text()).size(LABEL_SIZE).color(color));

                ui.spacing_mut().slider_width = SLIDER_WIDTH;
                ui.add(
                    egui::Slider::new(&mut percent, 0..=100)
                        .show_value(false)
                        .clamping(SliderClamping::Always),
                )
            })
            .inner;

        if !response.changed() {
            return None;
        }
        binding.set_volume(percent);
        Some(percent)
    }
}
