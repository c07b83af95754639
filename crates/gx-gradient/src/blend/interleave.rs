//! Interleave blend — keep every stop from every input at its original
//! position.
//!
//! The one strategy that preserves source structure exactly: nothing is
//! resampled, nothing moves (except optional minimum-spacing nudges). Stops
//! that land within `tolerance` of each other are grouped; the group either
//! collapses to one winner or, with `preserve_all`, fans out with tiny
//! offsets so every color survives.

use gx_color::Rgb;

use super::{BlendKind, WeightedGradient, effective_inputs, empty_result, finish};
use crate::gradient::Gradient;
use crate::param::{ParamSpec, find_spec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterleaveParams {
    /// Favor stops from heavier gradients when positions collide.
    pub use_weights: bool,
    /// Stops closer than this are considered the same position.
    pub tolerance: f32,
    /// Keep every colliding stop, offset slightly, instead of picking one.
    pub preserve_all: bool,
    /// Minimum spacing enforced between consecutive output stops.
    pub min_spacing: f32,
}

impl Default for InterleaveParams {
    fn default() -> Self {
        Self {
            use_weights: true,
            tolerance: 0.001,
            preserve_all: false,
            min_spacing: 0.005,
        }
    }
}

impl InterleaveParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "use_weights",
            label: "Use Weights",
            min: 0.0,
            max: 1.0,
            default: 1.0,
            step: 1.0,
            description: "Resolve position collisions in favor of heavier gradients",
        },
        ParamSpec {
            key: "tolerance",
            label: "Position Tolerance",
            min: 0.0,
            max: 0.1,
            default: 0.001,
            step: 0.001,
            description: "Stops closer than this count as the same position",
        },
        ParamSpec {
            key: "preserve_all",
            label: "Preserve All Stops",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            step: 1.0,
            description: "Keep every colliding stop with a tiny offset",
        },
        ParamSpec {
            key: "min_spacing",
            label: "Minimum Spacing",
            min: 0.0,
            max: 0.1,
            default: 0.005,
            step: 0.001,
            description: "Minimum distance between consecutive output stops",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "use_weights" => self.use_weights = ParamSpec::as_bool(v),
            "tolerance" => self.tolerance = v,
            "preserve_all" => self.preserve_all = ParamSpec::as_bool(v),
            "min_spacing" => self.min_spacing = v,
            _ => return false,
        }
        true
    }
}

pub fn blend(params: &InterleaveParams, inputs: &[WeightedGradient]) -> Gradient {
    let inputs = effective_inputs(inputs, params.use_weights);
    if inputs.is_empty() {
        return empty_result(BlendKind::Interleave);
    }
    if inputs.len() == 1 {
        return super::clone_result(BlendKind::Interleave, inputs[0].0);
    }

    // Flatten to (position, color, weight), sorted by position.
    let mut entries: Vec<(f32, Rgb, f32)> = Vec::new();
    for (gradient, weight) in &inputs {
        let w = if params.use_weights { *weight } else { 1.0 };
        for stop in gradient.stops() {
            entries.push((stop.position, stop.color, w));
        }
    }
    entries.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut stops: Vec<(f32, Rgb)> = Vec::with_capacity(entries.len());
    let mut i = 0;
    while i < entries.len() {
        // Collect the run of entries within tolerance of the run's start.
        let anchor = entries[i].0;
        let mut j = i + 1;
        while j < entries.len() && (entries[j].0 - anchor).abs() <= params.tolerance {
            j += 1;
        }
        let group = &entries[i..j];

        if params.preserve_all && group.len() > 1 {
            #[allow(clippy::cast_precision_loss)]
            for (k, &(_, color, _)) in group.iter().enumerate() {
                let offset = k as f32 * params.tolerance;
                stops.push(((anchor + offset).min(1.0), color));
            }
        } else {
            #[allow(clippy::cast_precision_loss)]
            let mean = group.iter().map(|e| e.0).sum::<f32>() / group.len() as f32;
            let winner = if params.use_weights {
                // First entry among the heaviest wins ties.
                group
                    .iter()
                    .fold(group[0], |best, &e| if e.2 > best.2 { e } else { best })
                    .1
            } else {
                group[group.len() - 1].1
            };
            stops.push((mean, winner));
        }
        i = j;
    }

    // Enforce minimum spacing by nudging forward, never past 1.0.
    if params.min_spacing > 0.0 {
        for k in 1..stops.len() {
            let floor = stops[k - 1].0 + params.min_spacing;
            if stops[k].0 < floor {
                stops[k].0 = floor.min(1.0);
            }
        }
    }

    finish(BlendKind::Interleave, stops)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::gradient::{ColorStop, Gradient};

    fn g(stops: &[(f32, Rgb)]) -> Gradient {
        Gradient::from_stops(
            "g",
            stops.iter().map(|&(p, c)| ColorStop::new(p, c)).collect(),
        )
    }

    #[test]
    fn preserves_all_distinct_positions() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(0, 0, 255))]);
        let b = g(&[(0.5, Rgb::new(0, 255, 0))]);
        let out = blend(&InterleaveParams::default(), &[(&a, 1.0), (&b, 1.0)]);

        assert_eq!(out.len(), 3);
        assert_eq!(out.stops()[0].color, Rgb::new(255, 0, 0));
        assert_eq!(out.stops()[1].color, Rgb::new(0, 255, 0));
        assert_eq!(out.stops()[2].color, Rgb::new(0, 0, 255));
        assert!((out.stops()[1].position - 0.5).abs() < 1e-6);
    }

    #[test]
    fn collision_resolved_by_weight() {
        let a = g(&[(0.5, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.5, Rgb::new(0, 0, 255))]);
        let out = blend(&InterleaveParams::default(), &[(&a, 1.0), (&b, 5.0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out.stops()[0].color, Rgb::new(0, 0, 255));
    }

    #[test]
    fn preserve_all_keeps_collisions() {
        let a = g(&[(0.5, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.5, Rgb::new(0, 0, 255))]);
        let params = InterleaveParams {
            preserve_all: true,
            min_spacing: 0.0,
            ..InterleaveParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn min_spacing_nudges_close_stops() {
        let a = g(&[(0.5, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.503, Rgb::new(0, 0, 255))]);
        let params = InterleaveParams {
            tolerance: 0.001,
            min_spacing: 0.01,
            ..InterleaveParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        assert_eq!(out.len(), 2);
        assert!(out.stops()[1].position - out.stops()[0].position >= 0.01 - 1e-6);
    }

    #[test]
    fn zero_weight_gradient_excluded() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(1.0, Rgb::new(0, 0, 255))]);
        let out = blend(&InterleaveParams::default(), &[(&a, 1.0), (&b, 0.0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out.stops()[0].color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn single_input_is_clone() {
        let a = g(&[(0.0, Rgb::BLACK), (1.0, Rgb::WHITE)]);
        let out = blend(&InterleaveParams::default(), &[(&a, 1.0)]);
        assert_eq!(out.stops(), a.stops());
    }
}
