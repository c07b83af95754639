//! Stack blend — compress each input into its own segment of the range.
//!
//! Unlike crossfade there is no seam blending: each gradient is squeezed
//! whole into a weight-proportional slice, with optional hard gaps between
//! slices. The result reads like the inputs laid end to end.

use super::{
    BlendKind, WeightedGradient, clone_result, effective_inputs, empty_result, finish,
    segment_sizes,
};
use gx_color::Rgb;

use crate::gradient::{Gradient, POSITION_EPSILON};
use crate::param::{ParamSpec, find_spec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackParams {
    /// Size segments by gradient weight (equal segments otherwise).
    pub use_weights: bool,
    /// Fraction of the range left empty between consecutive segments.
    pub gap_size: f32,
    /// Stack the inputs last-to-first.
    pub reverse_order: bool,
}

impl Default for StackParams {
    fn default() -> Self {
        Self {
            use_weights: true,
            gap_size: 0.0,
            reverse_order: false,
        }
    }
}

impl StackParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "use_weights",
            label: "Use Weights",
            min: 0.0,
            max: 1.0,
            default: 1.0,
            step: 1.0,
            description: "Size each segment by its gradient's weight",
        },
        ParamSpec {
            key: "gap_size",
            label: "Gap Size",
            min: 0.0,
            max: 0.2,
            default: 0.0,
            step: 0.01,
            description: "Empty space between consecutive segments",
        },
        ParamSpec {
            key: "reverse_order",
            label: "Reverse Order",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            step: 1.0,
            description: "Stack the gradients last-to-first",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "use_weights" => self.use_weights = ParamSpec::as_bool(v),
            "gap_size" => self.gap_size = v,
            "reverse_order" => self.reverse_order = ParamSpec::as_bool(v),
            _ => return false,
        }
        true
    }
}

pub fn blend(params: &StackParams, inputs: &[WeightedGradient]) -> Gradient {
    let mut inputs = effective_inputs(inputs, params.use_weights);
    if inputs.is_empty() {
        return empty_result(BlendKind::Stack);
    }
    if inputs.len() == 1 {
        return clone_result(BlendKind::Stack, inputs[0].0);
    }
    if params.reverse_order {
        inputs.reverse();
    }

    let n = inputs.len();
    #[allow(clippy::cast_precision_loss)]
    // A gap per seam; cap the total so segments keep most of the range.
    let gap = params.gap_size.min(0.5 / (n as f32 - 1.0));
    #[allow(clippy::cast_precision_loss)]
    let total_gap = gap * (n as f32 - 1.0);
    let usable = 1.0 - total_gap;

    let sizes: Vec<f32> = segment_sizes(&inputs, params.use_weights)
        .into_iter()
        .map(|s| s * usable)
        .collect();

    let mut stops: Vec<(f32, Rgb)> = Vec::new();
    let mut start = 0.0f32;
    for (i, (gradient, _)) in inputs.iter().enumerate() {
        let span = sizes[i];
        // Sample at the gradient's own stop positions plus both segment
        // edges, so the squeeze keeps the source structure.
        let mut locals: Vec<f32> = gradient.stops().iter().map(|s| s.position).collect();
        locals.push(0.0);
        locals.push(1.0);
        locals.sort_by(f32::total_cmp);
        locals.dedup_by(|a, b| (*a - *b).abs() < POSITION_EPSILON);
        for local in locals {
            stops.push((local.mul_add(span, start), gradient.color_at(local)));
        }
        start += span + gap;
    }

    finish(BlendKind::Stack, stops)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::gradient::ColorStop;

    fn g(stops: &[(f32, Rgb)]) -> Gradient {
        Gradient::from_stops(
            "g",
            stops.iter().map(|&(p, c)| ColorStop::new(p, c)).collect(),
        )
    }

    #[test]
    fn two_equal_inputs_split_at_half() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(0, 0, 255))]);
        let out = blend(&StackParams::default(), &[(&a, 1.0), (&b, 1.0)]);
        assert_eq!(out.color_at(0.2), Rgb::new(255, 0, 0));
        assert_eq!(out.color_at(0.8), Rgb::new(0, 0, 255));
    }

    #[test]
    fn weights_resize_segments() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(0, 0, 255))]);
        let out = blend(&StackParams::default(), &[(&a, 3.0), (&b, 1.0)]);
        // First segment covers [0, 0.75].
        assert_eq!(out.color_at(0.7), Rgb::new(255, 0, 0));
        assert_eq!(out.color_at(0.8), Rgb::new(0, 0, 255));
    }

    #[test]
    fn source_shape_survives_compression() {
        let a = g(&[
            (0.0, Rgb::BLACK),
            (0.5, Rgb::new(255, 0, 0)),
            (1.0, Rgb::BLACK),
        ]);
        let b = g(&[(0.0, Rgb::WHITE), (1.0, Rgb::WHITE)]);
        let out = blend(&StackParams::default(), &[(&a, 1.0), (&b, 1.0)]);
        // The red peak at local 0.5 lands at global 0.25.
        let peak = out.color_at(0.25);
        assert!(peak.r > 200, "peak lost: {peak}");
    }

    #[test]
    fn reverse_order_flips_segments() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(0, 0, 255))]);
        let params = StackParams {
            reverse_order: true,
            ..StackParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        assert_eq!(out.color_at(0.2), Rgb::new(0, 0, 255));
        assert_eq!(out.color_at(0.8), Rgb::new(255, 0, 0));
    }

    #[test]
    fn gaps_leave_room_between_segments() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(0, 0, 255))]);
        let params = StackParams {
            gap_size: 0.1,
            ..StackParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        // Segments are [0, 0.45] and [0.55, 1.0].
        let last_red = out
            .stops()
            .iter()
            .filter(|s| s.color == Rgb::new(255, 0, 0))
            .map(|s| s.position)
            .fold(0.0f32, f32::max);
        let first_blue = out
            .stops()
            .iter()
            .filter(|s| s.color == Rgb::new(0, 0, 255))
            .map(|s| s.position)
            .fold(1.0f32, f32::min);
        assert!((last_red - 0.45).abs() < 1e-3);
        assert!((first_blue - 0.55).abs() < 1e-3);
    }

    #[test]
    fn single_input_is_clone() {
        let a = g(&[(0.0, Rgb::BLACK), (1.0, Rgb::WHITE)]);
        let out = blend(&StackParams::default(), &[(&a, 1.0)]);
        assert_eq!(out.stops(), a.stops());
    }
}
