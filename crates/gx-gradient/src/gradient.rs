//! The gradient entity — an ordered sequence of positioned color stops.
//!
//! A [`Gradient`] is the data model every blend and distribution operation
//! consumes and produces: stops at positions in [0, 1], each carrying an
//! 8-bit RGB color, plus a display name that operations propagate. Stops
//! keep their insertion order (callers may rely on unsorted sequences for
//! randomization effects); interpolation brackets over the whole list, so
//! it works either way. Engine outputs are always sorted.

use gx_color::Rgb;

/// Positions closer than this are treated as the same stop.
pub const POSITION_EPSILON: f32 = 0.001;

/// A single color stop: a color pinned at a position along the [0, 1] axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient axis, clamped to [0, 1].
    pub position: f32,
    /// The stop color.
    pub color: Rgb,
}

impl ColorStop {
    /// Create a stop, clamping the position into [0, 1].
    #[must_use]
    pub fn new(position: f32, color: Rgb) -> Self {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
        Self { position, color }
    }
}

/// An ordered collection of color stops with interpolation support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gradient {
    name: String,
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Number of default stops in the grayscale ramp.
    pub const DEFAULT_STOPS: usize = 10;

    /// Create an empty gradient with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stops: Vec::new(),
        }
    }

    /// Create a gradient from existing stops.
    #[must_use]
    pub fn from_stops(name: impl Into<String>, stops: Vec<ColorStop>) -> Self {
        Self {
            name: name.into(),
            stops,
        }
    }

    /// The default grayscale ramp: [`Self::DEFAULT_STOPS`] stops from black
    /// to white, evenly spaced.
    #[must_use]
    pub fn default_ramp() -> Self {
        let mut g = Self::new("default");
        for i in 0..Self::DEFAULT_STOPS {
            #[allow(clippy::cast_precision_loss)]
            let position = i as f32 / (Self::DEFAULT_STOPS - 1) as f32;
            let value = (255.0 * position).round();
            g.push_stop(ColorStop::new(position, Rgb::from_f32(value, value, value)));
        }
        g
    }

    /// The gradient's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the gradient.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The stops in their current order.
    #[must_use]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the gradient has no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Append a stop (keeps insertion order; no sorting).
    pub fn push_stop(&mut self, stop: ColorStop) {
        self.stops.push(stop);
    }

    /// A copy with stops sorted ascending by position.
    ///
    /// The sort is stable, so stops at coincident positions keep their
    /// relative insertion order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut g = self.clone();
        g.sort_stops();
        g
    }

    /// Sort stops in place, ascending by position (stable).
    pub fn sort_stops(&mut self) {
        self.stops
            .sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    /// The interpolated color at `position`.
    ///
    /// Brackets the position between the tightest stop at-or-before and
    /// at-or-after it and lerps between their colors. Positions outside the
    /// outermost stops clamp to the nearest stop's color. An empty gradient
    /// reports mid gray; a single stop is constant everywhere.
    #[must_use]
    pub fn color_at(&self, position: f32) -> Rgb {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };

        match self.stops.len() {
            0 => return Rgb::MID_GRAY,
            1 => return self.stops[0].color,
            _ => {}
        }

        // Tightest bracketing stops; the list may be unsorted. Among
        // coincident stops the later one wins on the `before` side, so a
        // hard cut (two stops sharing a position) samples as the incoming
        // color just past the cut.
        let mut before: Option<ColorStop> = None;
        let mut after: Option<ColorStop> = None;
        for &stop in &self.stops {
            if stop.position <= position
                && before.is_none_or(|best| stop.position >= best.position)
            {
                before = Some(stop);
            }
            if stop.position >= position
                && after.is_none_or(|best| stop.position < best.position)
            {
                after = Some(stop);
            }
        }

        match (before, after) {
            (Some(lo), Some(hi)) => {
                let span = hi.position - lo.position;
                if span <= f32::EPSILON {
                    lo.color
                } else {
                    lo.color.lerp(hi.color, (position - lo.position) / span)
                }
            }
            // Position below every stop: nearest is the overall minimum.
            (None, Some(hi)) => hi.color,
            // Position above every stop: nearest is the overall maximum.
            (Some(lo), None) => lo.color,
            (None, None) => Rgb::MID_GRAY,
        }
    }

    /// A copy whose last stop color equals the first, so the gradient tiles
    /// seamlessly when repeated. Gradients with fewer than 2 stops come
    /// back unchanged.
    #[must_use]
    pub fn seamless(&self) -> Self {
        let mut g = self.clone();
        if g.stops.len() >= 2 {
            let first = g.stops[0].color;
            if let Some(last) = g.stops.last_mut() {
                last.color = first;
            }
        }
        g
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_stop() -> Gradient {
        Gradient::from_stops(
            "t",
            vec![
                ColorStop::new(0.0, Rgb::new(255, 0, 0)),
                ColorStop::new(1.0, Rgb::new(0, 0, 255)),
            ],
        )
    }

    #[test]
    fn stop_position_clamped() {
        assert_eq!(ColorStop::new(-0.5, Rgb::BLACK).position, 0.0);
        assert_eq!(ColorStop::new(1.5, Rgb::BLACK).position, 1.0);
        assert_eq!(ColorStop::new(f32::NAN, Rgb::BLACK).position, 0.0);
    }

    #[test]
    fn empty_gradient_is_mid_gray() {
        let g = Gradient::new("empty");
        assert_eq!(g.color_at(0.0), Rgb::MID_GRAY);
        assert_eq!(g.color_at(0.7), Rgb::MID_GRAY);
    }

    #[test]
    fn single_stop_is_constant() {
        let g = Gradient::from_stops("one", vec![ColorStop::new(0.5, Rgb::new(10, 20, 30))]);
        assert_eq!(g.color_at(0.0), Rgb::new(10, 20, 30));
        assert_eq!(g.color_at(1.0), Rgb::new(10, 20, 30));
    }

    #[test]
    fn interpolates_between_stops() {
        let g = two_stop();
        assert_eq!(g.color_at(0.0), Rgb::new(255, 0, 0));
        assert_eq!(g.color_at(1.0), Rgb::new(0, 0, 255));
        let mid = g.color_at(0.5);
        assert!(mid.r.abs_diff(128) <= 1);
        assert!(mid.b.abs_diff(128) <= 1);
    }

    #[test]
    fn clamps_outside_outermost_stops() {
        let g = Gradient::from_stops(
            "inner",
            vec![
                ColorStop::new(0.25, Rgb::new(255, 0, 0)),
                ColorStop::new(0.75, Rgb::new(0, 0, 255)),
            ],
        );
        assert_eq!(g.color_at(0.0), Rgb::new(255, 0, 0));
        assert_eq!(g.color_at(1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn interpolation_works_on_unsorted_stops() {
        let g = Gradient::from_stops(
            "unsorted",
            vec![
                ColorStop::new(1.0, Rgb::new(0, 0, 255)),
                ColorStop::new(0.0, Rgb::new(255, 0, 0)),
                ColorStop::new(0.5, Rgb::new(0, 255, 0)),
            ],
        );
        assert_eq!(g.color_at(0.5), Rgb::new(0, 255, 0));
        assert_eq!(g.color_at(0.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn default_ramp_shape() {
        let g = Gradient::default_ramp();
        assert_eq!(g.len(), Gradient::DEFAULT_STOPS);
        assert_eq!(g.stops()[0].color, Rgb::BLACK);
        assert_eq!(g.stops()[g.len() - 1].color, Rgb::WHITE);
    }

    #[test]
    fn sorted_orders_by_position() {
        let g = Gradient::from_stops(
            "unsorted",
            vec![
                ColorStop::new(0.9, Rgb::BLACK),
                ColorStop::new(0.1, Rgb::WHITE),
                ColorStop::new(0.5, Rgb::MID_GRAY),
            ],
        )
        .sorted();
        let positions: Vec<f32> = g.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn seamless_pins_last_to_first() {
        let g = two_stop().seamless();
        assert_eq!(g.stops()[1].color, g.stops()[0].color);
        assert_eq!(g.stops()[1].position, 1.0);
    }

    #[test]
    fn seamless_single_stop_unchanged() {
        let g = Gradient::from_stops("one", vec![ColorStop::new(0.5, Rgb::BLACK)]);
        assert_eq!(g.seamless(), g);
    }
}
