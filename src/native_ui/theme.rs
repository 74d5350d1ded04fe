//! Colors and sizes for the overlay and the Settings window

use eframe::egui::{Color32, Vec2};

/// Opacity of the whole overlay window
pub const OVERLAY_OPACITY: f32 = 0.6;

/// Overlay window size
pub const OVERLAY_SIZE: Vec2 = Vec2::new(100.0, 60.0);

/// Distance of the overlay's origin from the bottom-right screen corner on launch
pub const OVERLAY_CORNER_OFFSET: Vec2 = Vec2::new(110.0, 100.0);

/// Settings window size
pub const SETTINGS_SIZE: Vec2 = Vec2::new(230.0, 160.0);

pub struct Theme;

impl Theme {
    pub const OVERLAY_BG: Color32 = Color32::WHITE;
    pub const OVERLAY_TEXT: Color32 = Color32::BLACK;

    pub fn overlay_background() -> Color32 {
        Self::OVERLAY_BG.gamma_multiply(OVERLAY_OPACITY)
    }

    pub fn overlay_text() -> Color32 {
        Self::OVERLAY_TEXT.gamma_multiply(OVERLAY_OPACITY)
    }
}

/// egui sizes are logical pixels; a typographic point is 1/72 inch at 96 DPI
const PX_PER_PT: f32 = 96.0 / 72.0;

pub struct FontSize;

impl FontSize {
    /// Quote label, 10 pt
    pub const OVERLAY: f32 = 10.0 * PX_PER_PT;
    /// Settings labels, 9 pt like the native dialog font
    pub const LABEL: f32 = 9.0 * PX_PER_PT;
}

pub struct Spacing;

impl Spacing {
    pub const XS: f32 = 4.0;
    pub const SM: f32 = 6.0;
    pub const MD: f32 = 10.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_sizes_in_logical_pixels() {
        assert!((FontSize::OVERLAY - 13.333).abs() < 0.001);
        assert!((FontSize::LABEL - 12.0).abs() < 0.001);
    }
}
