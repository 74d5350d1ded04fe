//! Tray icon rendering
//!
//! Draws a rounded square in the trend color with a small white bar chart.

use image::{Rgba, RgbaImage};

use crate::core::Trend;

/// Edge length of the tray icon in pixels
pub const ICON_SIZE: u32 = 32;

const MARGIN: u32 = 2;
const CORNER: u32 = 5;

/// Bars of the chart glyph as (x0, x1, top); all bars end at the same baseline
const BARS: [(u32, u32, u32); 3] = [(8, 12, 18), (14, 18, 13), (20, 24, 8)];
const BASELINE: u32 = 24;

/// Render the icon for a trend
pub fn render(trend: Trend) -> RgbaImage {
    let (r, g, b) = trend.color();
    let background = Rgba([r, g, b, 255]);
    let border = Rgba([r / 2, g / 2, b / 2, 255]);
    let glyph = Rgba([255, 255, 255, 255]);
    let clear = Rgba([0, 0, 0, 0]);

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        if !in_rounded_square(x, y, MARGIN) {
            clear
        } else if !in_rounded_square(x, y, MARGIN + 1) {
            border
        } else if in_bar(x, y) {
            glyph
        } else {
            background
        }
    })
}

/// Raw RGBA bytes plus dimensions, as `tray_icon::Icon::from_rgba` wants them
pub fn render_rgba(trend: Trend) -> (Vec<u8>, u32, u32) {
    let image = render(trend);
    let (width, height) = image.dimensions();
    (image.into_raw(), width, height)
}

fn in_rounded_square(x: u32, y: u32, inset: u32) -> bool {
    let max = ICON_SIZE - 1 - inset;
    if x < inset || y < inset || x > max || y > max {
        return false;
    }

    // Distance into the corner region, zero along the straight edges
    let dx = (inset + CORNER).saturating_sub(x).max(x.saturating_sub(max - CORNER));
    let dy = (inset + CORNER).saturating_sub(y).max(y.saturating_sub(max - CORNER));
    dx * dx + dy * dy <= CORNER * CORNER
}

fn in_bar(x: u32, y: u32) -> bool {
    BARS.iter()
        .any(|&(x0, x1, top)| x >= x0 && x < x1 && y >= top && y < BASELINE)
}
