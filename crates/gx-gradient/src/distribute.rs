//! Color distribution — reorder stop colors over fixed positions.
//!
//! Distribution never moves a stop: it computes a scalar sort key per color,
//! permutes the colors by that key, and reassigns them to the original
//! position sequence. The strength blend then interpolates between the
//! original and the fully reordered sequence as a smooth traveling wave, so
//! dragging a strength slider never snaps.

use gx_color::{Rgb, rgb_to_hsv};

use crate::gradient::ColorStop;
use crate::rng::Xorshift32;

/// Normalization constant for RGB distance keys (the black-white diagonal).
const MAX_RGB_DISTANCE: f32 = 441.67;

/// The scalar key colors are ordered by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderingKey {
    /// Perceptual brightness (BT.601 luma), dark to light.
    Brightness,
    /// Hue angle around the color wheel.
    Hue,
    /// HSV saturation, gray to vivid.
    Saturation,
    /// Saturation times value (color intensity).
    Chroma,
    /// Cool blues and greens first, warm reds and oranges last.
    WarmCool,
    /// Euclidean RGB distance from a reference color.
    Distance(Rgb),
    /// Seeded shuffle instead of a sort.
    Random { seed: u32 },
}

impl OrderingKey {
    /// Machine name, for hosts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Chroma => "chroma",
            Self::WarmCool => "warm-cool",
            Self::Distance(_) => "distance",
            Self::Random { .. } => "random",
        }
    }

    /// Parse a key from its machine name. `Distance` gets a mid-gray
    /// reference and `Random` seed 0; callers refine afterwards.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "brightness" => Some(Self::Brightness),
            "hue" => Some(Self::Hue),
            "saturation" => Some(Self::Saturation),
            "chroma" => Some(Self::Chroma),
            "warm-cool" | "warmcool" => Some(Self::WarmCool),
            "distance" => Some(Self::Distance(Rgb::MID_GRAY)),
            "random" => Some(Self::Random { seed: 0 }),
            _ => None,
        }
    }

    /// All key names, in presentation order.
    #[must_use]
    pub const fn all_names() -> &'static [&'static str] {
        &[
            "brightness",
            "hue",
            "saturation",
            "chroma",
            "warm-cool",
            "distance",
            "random",
        ]
    }

    /// The sort key for one color, normalized to [0, 1].
    #[must_use]
    pub fn sort_key(self, color: Rgb) -> f32 {
        match self {
            Self::Brightness => color.luma() / 255.0,
            Self::Hue => {
                let (h, _, _) = rgb_to_hsv(color);
                h / 360.0
            }
            Self::Saturation => {
                let (_, s, _) = rgb_to_hsv(color);
                s
            }
            Self::Chroma => {
                let (_, s, v) = rgb_to_hsv(color);
                s * v
            }
            Self::WarmCool => warm_cool_key(color),
            Self::Distance(reference) => color.distance(reference) / MAX_RGB_DISTANCE,
            // Random never sorts by key.
            Self::Random { .. } => 0.0,
        }
    }
}

/// Cool hues (120°-300°) map to [0, 0.4], warm hues to [0.4, 1.0] with pure
/// red warmest.
fn warm_cool_key(color: Rgb) -> f32 {
    let (h, _, _) = rgb_to_hsv(color);
    if (120.0..=300.0).contains(&h) {
        0.4 * ((h - 120.0) / 180.0)
    } else {
        let warm = if h >= 300.0 {
            (h - 300.0) / 60.0
        } else {
            (60.0 - h) / 60.0
        };
        0.6f32.mul_add(warm, 0.4)
    }
}

/// Reorder stop colors by the ordering key, keeping every position exactly
/// where it was.
///
/// With `preserve_endpoints`, the original first and last colors stay pinned
/// at the first and last position and their occurrences are removed from the
/// sorted interior. Fewer than 2 stops come back unchanged.
#[must_use]
pub fn distribute(
    stops: &[ColorStop],
    key: OrderingKey,
    reverse: bool,
    preserve_endpoints: bool,
) -> Vec<ColorStop> {
    if stops.len() < 2 {
        return stops.to_vec();
    }

    let mut colors: Vec<Rgb> = stops.iter().map(|s| s.color).collect();

    if let OrderingKey::Random { seed } = key {
        let mut rng = Xorshift32::new(seed);
        if preserve_endpoints {
            let len = colors.len();
            rng.shuffle(&mut colors[1..len - 1]);
        } else {
            rng.shuffle(&mut colors);
        }
        // Reversing a shuffle is still a shuffle, so reverse must not
        // disturb the pinned endpoints.
        if reverse {
            if preserve_endpoints {
                let len = colors.len();
                colors[1..len - 1].reverse();
            } else {
                colors.reverse();
            }
        }
    } else {
        let mut keyed: Vec<(Rgb, f32)> = colors.iter().map(|&c| (c, key.sort_key(c))).collect();
        keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
        if reverse {
            keyed.reverse();
        }
        let mut sorted: Vec<Rgb> = keyed.into_iter().map(|(c, _)| c).collect();

        if preserve_endpoints {
            let first = colors[0];
            let last = colors[colors.len() - 1];
            // One occurrence per endpoint: the sorted list is a permutation
            // of the input, so it carries two when first == last.
            remove_first(&mut sorted, first);
            remove_first(&mut sorted, last);
            let mut pinned = Vec::with_capacity(colors.len());
            pinned.push(first);
            pinned.extend(sorted);
            pinned.push(last);
            sorted = pinned;
        }
        colors = sorted;
    }

    stops
        .iter()
        .zip(colors)
        .map(|(stop, color)| ColorStop::new(stop.position, color))
        .collect()
}

fn remove_first(colors: &mut Vec<Rgb>, target: Rgb) {
    if let Some(i) = colors.iter().position(|&c| c == target) {
        colors.remove(i);
    }
}

/// Smoothly interpolate between an original and a fully reordered stop
/// sequence.
///
/// The reordering travels as a wave from the first stop toward the last as
/// strength grows: each stop's local blend factor is a smoothstepped window
/// over the eased strength, and its original and reordered colors lerp per
/// channel by that factor. Strength 0 returns the original colors exactly,
/// 100 the reordered ones exactly, and every intermediate value moves every
/// channel continuously. Mismatched lengths fall back to the reordered
/// sequence.
#[must_use]
pub fn strength_blend(
    original: &[ColorStop],
    reordered: &[ColorStop],
    strength: f32,
) -> Vec<ColorStop> {
    if original.len() != reordered.len() {
        return reordered.to_vec();
    }
    let strength = if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 100.0)
    };
    if strength <= 0.0 {
        return original.to_vec();
    }
    if strength >= 100.0 {
        return original
            .iter()
            .zip(reordered)
            .map(|(orig, re)| ColorStop::new(orig.position, re.color))
            .collect();
    }

    // Width of the traveling transition zone, in index space.
    const WAVE_WIDTH: f32 = 0.3;

    let eased = smooth_step(strength / 100.0);
    let n = original.len();
    original
        .iter()
        .zip(reordered)
        .enumerate()
        .map(|(i, (orig, re))| {
            #[allow(clippy::cast_precision_loss)]
            let u = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            // The wave front overshoots both ends by one wave width so the
            // first and last stops complete their transition in range.
            let progress = (eased * (1.0 + WAVE_WIDTH) - u) / WAVE_WIDTH;
            let t = smooth_step(progress.clamp(0.0, 1.0));
            ColorStop::new(orig.position, orig.color.lerp(re.color, t))
        })
        .collect()
}

/// Distribute and strength-blend in one call.
#[must_use]
pub fn distribute_with_strength(
    stops: &[ColorStop],
    key: OrderingKey,
    reverse: bool,
    preserve_endpoints: bool,
    strength: f32,
) -> Vec<ColorStop> {
    let reordered = distribute(stops, key, reverse, preserve_endpoints);
    strength_blend(stops, &reordered, strength)
}

/// Hermite smoothstep, 3t² - 2t³ over [0, 1].
fn smooth_step(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * 2.0f32.mul_add(-t, 3.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
