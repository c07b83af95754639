// SPDX-License-Identifier: MIT
//
// gx-color — 8-bit RGB color math for gradient authoring.
//
// Single-character variable names (r, g, b, h, s, v) are the standard
// mathematical convention in color science. Renaming them would make the
// code harder to compare against reference implementations.
#![allow(clippy::many_single_char_names)]
// Hue/saturation/value variable names are inherently similar.
#![allow(clippy::similar_names)]
// f32→u8 truncation is intentional (channels are rounded and clamped first).
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Color math for gradient authoring.
//!
//! Gradients destined for flame renderers live in plain 8-bit RGB — the
//! MAP and UGR interchange formats know nothing else. This crate keeps the
//! whole pipeline in that space: an [`Rgb`] triple with clamped
//! constructors, HSV conversion for the algorithms that need hue or
//! saturation, BT.601 luma as the one documented brightness formula, and a
//! circular accumulator for averaging hues without wraparound artifacts.
//!
//! Everything here is a pure function of its inputs. No color management,
//! no gamma — user-tunable heuristics over discrete tuples, by design.

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An 8-bit RGB color, the native currency of gradient interchange formats.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel, 0-255.
    pub r: u8,
    /// Green channel, 0-255.
    pub g: u8,
    /// Blue channel, 0-255.
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from float channels in the 0-255 range.
    ///
    /// Each channel is clamped and rounded; out-of-range and non-finite
    /// inputs never panic (NaN becomes 0).
    #[must_use]
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Mid gray — the universal fallback for degenerate color math.
    pub const MID_GRAY: Self = Self::new(128, 128, 128);

    /// Parse a hex color string: `#RGB` or `#RRGGBB`, `#` optional.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        match s.len() {
            3 => {
                let mut it = s.chars();
                let r = it.next()?.to_digit(16)? as u8;
                let g = it.next()?.to_digit(16)? as u8;
                let b = it.next()?.to_digit(16)? as u8;
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16).ok()?;
                let g = u8::from_str_radix(&s[2..4], 16).ok()?;
                let b = u8::from_str_radix(&s[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Format as a lowercase `#rrggbb` hex string.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// BT.601 luma: `0.299 r + 0.587 g + 0.114 b`, in [0, 255].
    ///
    /// This is the one brightness formula used everywhere in the engine —
    /// sorting, contrast, tie-breaking — so results stay comparable.
    #[must_use]
    pub fn luma(self) -> f32 {
        0.114f32.mul_add(
            f32::from(self.b),
            0.299f32.mul_add(f32::from(self.r), 0.587 * f32::from(self.g)),
        )
    }

    /// Euclidean distance to another color in RGB space.
    ///
    /// Ranges from 0 to ~441.67 (`sqrt(3 · 255²)`).
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dr = f32::from(self.r) - f32::from(other.r);
        let dg = f32::from(self.g) - f32::from(other.g);
        let db = f32::from(self.b) - f32::from(other.b);
        db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
    }

    /// Linear interpolation between two colors, per channel.
    ///
    /// `t = 0` returns `self` exactly, `t = 1` returns `other` exactly;
    /// `t` outside [0, 1] is clamped.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }
        let mix = |a: u8, b: u8| (f32::from(b) - f32::from(a)).mul_add(t, f32::from(a));
        Self::from_f32(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Clamp and round a float channel value into 0-255.
#[must_use]
fn channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0).round() as u8
}

// ─── HSV conversion ──────────────────────────────────────────────────────────
//
// HSV here is the classic hexcone model: hue in degrees [0, 360), saturation
// and value in [0, 1]. Achromatic colors report hue 0.

/// Convert an RGB color to `(hue, saturation, value)`.
#[must_use]
pub fn rgb_to_hsv(color: Rgb) -> (f32, f32, f32) {
    let r = f32::from(color.r) / 255.0;
    let g = f32::from(color.g) / 255.0;
    let b = f32::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta <= f32::EPSILON {
        0.0
    } else if (max - r).abs() <= f32::EPSILON {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if (max - g).abs() <= f32::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let s = if max <= f32::EPSILON { 0.0 } else { delta / max };

    (h.rem_euclid(360.0), s, max)
}

/// Convert `(hue, saturation, value)` back to RGB.
///
/// Hue is taken mod 360; saturation and value are clamped to [0, 1].
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    if s <= f32::EPSILON {
        // Achromatic.
        return Rgb::from_f32(v * 255.0, v * 255.0, v * 255.0);
    }

    let h = h.rem_euclid(360.0) / 60.0;
    let i = h.floor();
    let f = h - i;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb::from_f32(r * 255.0, g * 255.0, b * 255.0)
}

// ─── Circular hue averaging ──────────────────────────────────────────────────

/// Weighted circular mean accumulator for hue angles.
///
/// Averaging hues arithmetically produces wraparound artifacts (the mean of
/// 350° and 10° is not 180°). This accumulator sums unit vectors instead and
/// recovers the angle with `atan2`, which handles the wrap correctly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HueMean {
    sin_sum: f32,
    cos_sum: f32,
}

impl HueMean {
    /// Empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sin_sum: 0.0,
            cos_sum: 0.0,
        }
    }

    /// Add a hue angle (degrees) with the given weight.
    pub fn add(&mut self, hue_degrees: f32, weight: f32) {
        let rad = hue_degrees.to_radians();
        self.sin_sum = rad.sin().mul_add(weight, self.sin_sum);
        self.cos_sum = rad.cos().mul_add(weight, self.cos_sum);
    }

    /// The circular mean in [0, 360), or `None` when nothing was added
    /// (or the contributions cancelled exactly).
    #[must_use]
    pub fn mean(self) -> Option<f32> {
        if self.sin_sum.abs() <= f32::EPSILON && self.cos_sum.abs() <= f32::EPSILON {
            return None;
        }
        let deg = self.sin_sum.atan2(self.cos_sum).to_degrees();
        Some(deg.rem_euclid(360.0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
