//! Application theming and status colors
//!
//! Presentation-only concern: the core reports state, this module decides
//! how it looks. There is no OS theme probing; the user flips between the two
//! themes from the toolbar.

use egui::{Color32, Visuals};

/// Application theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Dark theme (default)
    #[default]
    Dark,
    /// Light theme
    Light,
}

impl Theme {
    /// Apply theme to egui context
    pub fn apply(&self, ctx: &egui::Context) {
        match self {
            Self::Dark => ctx.set_visuals(Visuals::dark()),
            Self::Light => ctx.set_visuals(Visuals::light()),
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Fill for an engaged toggle (system/heater/motor on).
pub const COLOR_ON: Color32 = Color32::from_rgb(51, 204, 51);

/// Fill for a disengaged toggle.
pub const COLOR_OFF: Color32 = Color32::from_rgb(204, 51, 51);

/// Fill for the master toggle while the system is off.
pub const COLOR_NEUTRAL: Color32 = Color32::from_rgb(64, 64, 72);

/// Dim color for the display while no reading is available.
pub const COLOR_NO_READING: Color32 = Color32::from_rgb(128, 128, 128);

/// Color ramp for the temperature display.
///
/// Green at ambient, sliding to red as the hotend warms past 36 °C and
/// saturating fully red around 100 °C.
pub fn temperature_color(temp: f32) -> Color32 {
    if temp <= 36.0 {
        return Color32::from_rgb(0, 255, 0);
    }
    let intensity = ((temp - 36.0) * 4.0).min(255.0) as u8;
    Color32::from_rgb(intensity, 255 - intensity, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_color_ramp() {
        assert_eq!(temperature_color(20.0), Color32::from_rgb(0, 255, 0));
        assert_eq!(temperature_color(36.0), Color32::from_rgb(0, 255, 0));
        // Fully red once well past the ramp
        assert_eq!(temperature_color(250.0), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
