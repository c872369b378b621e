use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::{Channel, CHANNEL_COUNT};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Fixed colour per channel so a channel looks the same in every chart.
pub fn channel_color(channel: Channel) -> Color32 {
    spaced_hue(channel.index(), CHANNEL_COUNT)
}

/// The `i`-th of `n` colours with evenly spaced hues.
fn spaced_hue(i: usize, n: usize) -> Color32 {
    let hue = (i as f32 / n as f32) * 360.0;
    let rgb: Srgb = Hsl::new(hue, 0.70, 0.55).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging map for correlation coefficients
// ---------------------------------------------------------------------------

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

/// Map a coefficient in `[-1, 1]` onto a blue → grey → red ramp.
///
/// Interpolation happens in linear RGB; out-of-range input is clamped.
pub fn coolwarm(value: f64) -> Color32 {
    let t = value.clamp(-1.0, 1.0) as f32;
    let neutral = linear(NEUTRAL);
    let mixed = if t < 0.0 {
        neutral.mix(linear(COOL), -t)
    } else {
        neutral.mix(linear(WARM), t)
    };
    let rgb = Srgb::<u8>::from_linear(mixed);
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_linear()
}
