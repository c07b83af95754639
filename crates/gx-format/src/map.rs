//! The JWildfire MAP palette format.
//!
//! A MAP file is 256 lines of space-separated RGB triples in 0-255, one
//! color per line, sampled uniformly across the gradient. Loading reduces
//! the color list back to a manageable stop count (square-root rule, capped
//! at [`MAX_FILE_STOPS`]) instead of creating one stop per line.

use std::fs;
use std::path::Path;

use gx_color::Rgb;
use gx_gradient::{ColorStop, Gradient};
use tracing::debug;

use crate::error::FormatError;
use crate::MAX_FILE_STOPS;

/// Number of palette lines in a MAP file.
pub const MAP_SAMPLES: usize = 256;

/// Render a gradient to MAP text: 256 uniformly sampled lines of
/// `"RRR GGG BBB"` with right-aligned 3-wide fields.
#[must_use]
pub fn write_map(gradient: &Gradient) -> String {
    let mut out = String::with_capacity(MAP_SAMPLES * 12);
    for i in 0..MAP_SAMPLES {
        #[allow(clippy::cast_precision_loss)]
        let position = i as f32 / (MAP_SAMPLES - 1) as f32;
        let color = gradient.color_at(position);
        out.push_str(&format!("{:>3} {:>3} {:>3}\n", color.r, color.g, color.b));
    }
    out
}

/// Parse MAP text into a gradient.
///
/// Blank lines are skipped and lines that do not start with three integer
/// fields are rejected. The color list is reduced to evenly spaced stops:
/// at least 10, at most [`MAX_FILE_STOPS`], roughly the square root of the
/// line count in between.
pub fn parse_map(text: &str, name: &str) -> Result<Gradient, FormatError> {
    let mut colors: Vec<Rgb> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let mut channel = |name: &str| -> Result<u8, FormatError> {
            let field = fields.next().ok_or_else(|| {
                FormatError::Malformed(format!("line {}: missing {name} value", lineno + 1))
            })?;
            field.parse::<u8>().map_err(|_| {
                FormatError::Malformed(format!("line {}: bad {name} value {field:?}", lineno + 1))
            })
        };
        let r = channel("red")?;
        let g = channel("green")?;
        let b = channel("blue")?;
        colors.push(Rgb::new(r, g, b));
    }
    if colors.is_empty() {
        return Err(FormatError::Empty);
    }

    let num_stops = stop_count(colors.len());
    let mut gradient = Gradient::new(name);
    for i in 0..num_stops {
        #[allow(clippy::cast_precision_loss)]
        let position = i as f32 / (num_stops - 1) as f32;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let idx = (i as f32 * (colors.len() - 1) as f32 / (num_stops - 1) as f32) as usize;
        gradient.push_stop(ColorStop::new(position, colors[idx]));
    }
    Ok(gradient)
}

/// Square-root stop reduction, clamped to [10, `MAX_FILE_STOPS`] (or the
/// color count itself when smaller).
fn stop_count(colors: usize) -> usize {
    if colors < 2 {
        return 2;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let by_sqrt = (colors as f64).sqrt().ceil() as usize;
    by_sqrt.max(10).min(MAX_FILE_STOPS).min(colors)
}

/// Write a gradient to a `.map` file.
pub fn save_map(gradient: &Gradient, path: &Path) -> Result<(), FormatError> {
    debug!(path = %path.display(), stops = gradient.len(), "saving MAP file");
    fs::write(path, write_map(gradient))?;
    Ok(())
}

/// Load a gradient from a `.map` file. The gradient is named after the file
/// stem.
pub fn load_map(path: &Path) -> Result<Gradient, FormatError> {
    debug!(path = %path.display(), "loading MAP file");
    let text = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map_or_else(|| "gradient".to_string(), |s| s.to_string_lossy().into_owned());
    parse_map(&text, &name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
