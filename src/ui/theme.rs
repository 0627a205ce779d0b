//! Widget colors.
//!
//! Dark Windows 11 palette; the widget sits on the desktop wallpaper.

use eframe::egui;

/// Widget theme colors.
pub struct Theme {
    /// Panel background
    pub background: egui::Color32,

    /// Slider track and row surface
    pub surface: egui::Color32,

    /// Slider fill
    pub accent: egui::Color32,

    /// Row labels
    pub text_primary: egui::Color32,

    /// Placeholder text
    pub text_secondary: egui::Color32,

    /// Rows whose control failed, and the load error line
    pub error: egui::Color32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: egui::Color32::from_rgb(32, 32, 32),
            surface: egui::Color32::from_rgb(45, 45, 45),
            accent: egui::Color32::from_rgb(0, 120, 212),
            text_primary: egui::Color32::from_rgb(255, 255, 255),
            text_secondary: egui::Color32::from_rgb(160, 160, 160),
            error: egui::Color32::from_rgb(239, 68, 68),
        }
    }

    /// Apply the theme to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.background;

        style.visuals.widgets.inactive.bg_fill = self.surface;
        style.visuals.widgets.hovered.bg_fill = self.surface;
        style.visuals.widgets.active.bg_fill = self.accent;
        style.visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;

        // Filled part of the slider track
        style.visuals.selection.bg_fill = self.accent;
        style.visuals.slider_trailing_fill = true;

        ctx.set_style(style);
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
