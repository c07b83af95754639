//! Built-in gradient presets.
//!
//! Small fixed palettes used as starting material for blending and as test
//! fixtures. `default` and `grayscale` are the same black-to-white ramp
//! under two names.

use gx_color::Rgb;

use crate::gradient::{ColorStop, Gradient};

/// Names of all built-in presets, in presentation order.
#[must_use]
pub const fn preset_names() -> &'static [&'static str] {
    &["default", "rainbow", "sunset", "fire", "ocean", "grayscale"]
}

/// Look up a built-in preset by name (case-insensitive).
#[must_use]
pub fn preset(name: &str) -> Option<Gradient> {
    match name.to_lowercase().as_str() {
        "default" => Some(Gradient::default_ramp()),
        "rainbow" => Some(from_data("rainbow", RAINBOW)),
        "sunset" => Some(from_data("sunset", SUNSET)),
        "fire" => Some(from_data("fire", FIRE)),
        "ocean" => Some(from_data("ocean", OCEAN)),
        "grayscale" => {
            let mut g = Gradient::default_ramp();
            g.set_name("grayscale");
            Some(g)
        }
        _ => None,
    }
}

fn from_data(name: &str, data: &[(f32, (u8, u8, u8))]) -> Gradient {
    Gradient::from_stops(
        name,
        data.iter()
            .map(|&(pos, (r, g, b))| ColorStop::new(pos, Rgb::new(r, g, b)))
            .collect(),
    )
}

const RAINBOW: &[(f32, (u8, u8, u8))] = &[
    (0.0, (255, 0, 0)),
    (0.125, (255, 127, 0)),
    (0.25, (255, 255, 0)),
    (0.375, (127, 255, 0)),
    (0.5, (0, 255, 0)),
    (0.625, (0, 255, 127)),
    (0.75, (0, 127, 255)),
    (0.875, (0, 0, 255)),
    (0.9375, (127, 0, 255)),
    (1.0, (255, 0, 255)),
];

const SUNSET: &[(f32, (u8, u8, u8))] = &[
    (0.0, (15, 10, 39)),
    (0.2, (44, 33, 100)),
    (0.4, (130, 55, 150)),
    (0.5, (191, 64, 95)),
    (0.6, (255, 93, 35)),
    (0.7, (254, 192, 81)),
    (0.8, (255, 229, 119)),
    (0.9, (255, 247, 229)),
    (1.0, (200, 255, 255)),
];

const FIRE: &[(f32, (u8, u8, u8))] = &[
    (0.0, (7, 5, 9)),
    (0.1, (31, 7, 1)),
    (0.25, (80, 11, 0)),
    (0.4, (142, 27, 0)),
    (0.5, (204, 47, 0)),
    (0.6, (255, 91, 0)),
    (0.7, (255, 135, 0)),
    (0.8, (255, 180, 0)),
    (0.9, (255, 220, 0)),
    (1.0, (255, 255, 224)),
];

const OCEAN: &[(f32, (u8, u8, u8))] = &[
    (0.0, (0, 5, 30)),
    (0.1, (0, 10, 50)),
    (0.2, (0, 20, 80)),
    (0.3, (0, 30, 100)),
    (0.4, (0, 40, 120)),
    (0.5, (0, 60, 153)),
    (0.6, (0, 85, 180)),
    (0.7, (0, 120, 200)),
    (0.8, (0, 160, 215)),
    (0.9, (42, 200, 232)),
    (1.0, (110, 230, 244)),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
