//! The JWildfire UGR gradient format.
//!
//! UGR is XML: a `<gradientUGR>` root holding one `<gradient>` element per
//! gradient, each with `<color index="0..399" rgb="r|g|b"/>` children. The
//! index axis is JWildfire's fixed 0-399 position scale. Files may carry
//! more stops than the editor supports; loading downsamples to
//! [`MAX_FILE_STOPS`] keeping the first and last stop.

use std::fs;
use std::path::Path;

use gx_color::Rgb;
use gx_gradient::{ColorStop, Gradient};
use tracing::debug;
use xmlwriter::{Options, XmlWriter};

use crate::error::FormatError;
use crate::MAX_FILE_STOPS;

/// JWildfire's integer position scale.
const UGR_INDEX_MAX: f32 = 399.0;

/// Render gradients as a UGR document.
#[must_use]
pub fn write_ugr(gradients: &[&Gradient], category: &str) -> String {
    let mut w = XmlWriter::new(Options::default());
    w.start_element("gradientUGR");
    for gradient in gradients {
        w.start_element("gradient");
        let name = if gradient.name().is_empty() {
            "Gradient"
        } else {
            gradient.name()
        };
        w.write_attribute("name", name);
        w.write_attribute("cat", category);
        w.write_attribute("smooth", "T");
        for stop in gradient.sorted().stops() {
            w.start_element("color");
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (stop.position * UGR_INDEX_MAX) as u32;
            w.write_attribute("index", &index);
            w.write_attribute(
                "rgb",
                &format!("{}|{}|{}", stop.color.r, stop.color.g, stop.color.b),
            );
            w.end_element();
        }
        w.end_element();
    }
    w.end_document()
}

/// Parse a UGR document into its gradients.
///
/// Color stops are sorted by index; a gradient carrying more than
/// [`MAX_FILE_STOPS`] stops is downsampled, always keeping its first and
/// last stop. A `<gradient>` with no parsable colors falls back to the
/// default ramp under its own name.
pub fn parse_ugr(text: &str) -> Result<Vec<Gradient>, FormatError> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|err| FormatError::Malformed(err.to_string()))?;

    let mut gradients = Vec::new();
    for node in doc
        .descendants()
        .filter(|n| n.has_tag_name("gradient"))
    {
        let name = node.attribute("name").unwrap_or("Untitled");
        let mut stops: Vec<ColorStop> = Vec::new();
        for color in node.children().filter(|n| n.has_tag_name("color")) {
            let Some(stop) = parse_color(&color) else {
                continue;
            };
            stops.push(stop);
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));

        let gradient = if stops.is_empty() {
            let mut g = Gradient::default_ramp();
            g.set_name(name);
            g
        } else {
            Gradient::from_stops(name, downsample(stops))
        };
        gradients.push(gradient);
    }

    if gradients.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(gradients)
}

fn parse_color(node: &roxmltree::Node<'_, '_>) -> Option<ColorStop> {
    let index: f32 = node.attribute("index")?.parse().ok()?;
    let rgb = node.attribute("rgb")?;
    let mut parts = rgb.split('|');
    let r: u8 = parts.next()?.trim().parse().ok()?;
    let g: u8 = parts.next()?.trim().parse().ok()?;
    let b: u8 = parts.next()?.trim().parse().ok()?;
    Some(ColorStop::new(index / UGR_INDEX_MAX, Rgb::new(r, g, b)))
}

/// Reduce a sorted stop list to at most [`MAX_FILE_STOPS`], keeping the
/// first and last stop and sampling the interior evenly.
fn downsample(stops: Vec<ColorStop>) -> Vec<ColorStop> {
    if stops.len() <= MAX_FILE_STOPS {
        return stops;
    }
    let mut sampled = Vec::with_capacity(MAX_FILE_STOPS);
    sampled.push(stops[0]);
    let interior = stops.len() - 2;
    for i in 1..MAX_FILE_STOPS - 1 {
        let idx = i * interior / (MAX_FILE_STOPS - 2) + 1;
        sampled.push(stops[idx]);
    }
    sampled.push(stops[stops.len() - 1]);
    sampled
}

/// Write gradients to a `.ugr` file.
pub fn save_ugr(gradients: &[&Gradient], category: &str, path: &Path) -> Result<(), FormatError> {
    debug!(path = %path.display(), count = gradients.len(), "saving UGR file");
    fs::write(path, write_ugr(gradients, category))?;
    Ok(())
}

/// Load all gradients from a `.ugr` file.
pub fn load_ugr(path: &Path) -> Result<Vec<Gradient>, FormatError> {
    debug!(path = %path.display(), "loading UGR file");
    let text = fs::read_to_string(path)?;
    parse_ugr(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_stop(name: &str) -> Gradient {
        Gradient::from_stops(
            name,
            vec![
                ColorStop::new(0.0, Rgb::new(255, 0, 0)),
                ColorStop::new(1.0, Rgb::new(0, 0, 255)),
            ],
        )
    }

    #[test]
    fn writes_the_ugr_shape() {
        let g = two_stop("Test Gradient");
        let text = write_ugr(&[&g], "Custom");
        assert!(text.contains("<gradientUGR>"));
        assert!(text.contains(r#"name="Test Gradient""#));
        assert!(text.contains(r#"cat="Custom""#));
        assert!(text.contains(r#"smooth="T""#));
        assert!(text.contains(r#"index="0""#));
        assert!(text.contains(r#"index="399""#));
        assert!(text.contains(r#"rgb="255|0|0""#));
        assert!(text.contains(r#"rgb="0|0|255""#));
    }

    #[test]
    fn round_trips_a_gradient() {
        let g = two_stop("rt");
        let text = write_ugr(&[&g], "Custom");
        let loaded = parse_ugr(&text).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "rt");
        assert_eq!(loaded[0].stops()[0].color, Rgb::new(255, 0, 0));
        assert_eq!(loaded[0].stops()[1].color, Rgb::new(0, 0, 255));
        assert!((loaded[0].stops()[1].position - 1.0).abs() < 0.01);
    }

    #[test]
    fn multiple_gradients_in_one_file() {
        let a = two_stop("a");
        let b = two_stop("b");
        let text = write_ugr(&[&a, &b], "Pack");
        let loaded = parse_ugr(&text).unwrap();
        let names: Vec<&str> = loaded.iter().map(Gradient::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn unparsable_colors_are_skipped() {
        let text = r#"<gradientUGR><gradient name="x" cat="c" smooth="T">
            <color index="0" rgb="1|2|3"/>
            <color index="notanumber" rgb="4|5|6"/>
            <color index="399" rgb="7|8"/>
            <color index="399" rgb="9|10|11"/>
        </gradient></gradientUGR>"#;
        let loaded = parse_ugr(text).unwrap();
        assert_eq!(loaded[0].len(), 2);
    }

    #[test]
    fn gradient_without_colors_gets_the_default_ramp() {
        let text = r#"<gradientUGR><gradient name="empty" cat="c"/></gradientUGR>"#;
        let loaded = parse_ugr(text).unwrap();
        assert_eq!(loaded[0].name(), "empty");
        assert_eq!(loaded[0].len(), Gradient::DEFAULT_STOPS);
    }

    #[test]
    fn oversized_gradient_is_downsampled() {
        let stops: Vec<ColorStop> = (0..200)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let p = f64::from(i) / 199.0;
                #[allow(clippy::cast_possible_truncation)]
                ColorStop::new(p as f32, Rgb::new(1, 2, 3))
            })
            .collect();
        let g = Gradient::from_stops("big", stops);
        let text = write_ugr(&[&g], "c");
        let loaded = parse_ugr(&text).unwrap();
        assert_eq!(loaded[0].len(), MAX_FILE_STOPS);
        assert!((loaded[0].stops()[0].position - 0.0).abs() < 0.01);
        assert!((loaded[0].stops()[MAX_FILE_STOPS - 1].position - 1.0).abs() < 0.01);
    }

    #[test]
    fn bad_xml_is_malformed() {
        assert!(matches!(
            parse_ugr("this is not xml <"),
            Err(FormatError::Malformed(_))
        ));
    }

    #[test]
    fn no_gradients_is_empty() {
        assert!(matches!(
            parse_ugr("<gradientUGR></gradientUGR>"),
            Err(FormatError::Empty)
        ));
    }

    #[test]
    fn files_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("gx_format_ugr_test.ugr");
        let g = two_stop("disk");
        save_ugr(&[&g], "Custom", &path).unwrap();
        let loaded = load_ugr(&path).unwrap();
        assert_eq!(loaded[0].name(), "disk");
        let _ = std::fs::remove_file(&path);
    }
}
