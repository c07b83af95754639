//! Crossfade blend — sequential segments with smooth overlapping seams.
//!
//! Each input owns a weight-proportional span of [0, 1] and is compressed
//! into it. Around every interior boundary an overlap region fades the
//! outgoing gradient into the incoming one, the way an audio crossfade
//! overlaps two tracks instead of butt-splicing them.

use gx_color::Rgb;

use super::{
    BlendKind, WeightedGradient, clone_result, effective_inputs, empty_result, finish,
    segment_boundaries, segment_sizes,
};
use crate::gradient::{Gradient, POSITION_EPSILON};
use crate::param::{ParamSpec, find_spec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossfadeParams {
    /// Size segments by gradient weight (equal segments otherwise).
    pub use_weights: bool,
    /// Overlap fraction of the smaller adjacent segment, per seam.
    pub overlap: f32,
}

impl Default for CrossfadeParams {
    fn default() -> Self {
        Self {
            use_weights: true,
            overlap: 0.3,
        }
    }
}

impl CrossfadeParams {
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
            key: "overlap",
            label: "Overlap Amount",
            min: 0.0,
            max: 1.0,
            default: 0.3,
            step: 0.05,
            description: "Seam width as a fraction of the smaller adjacent segment",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "use_weights" => self.use_weights = ParamSpec::as_bool(v),
            "overlap" => self.overlap = v,
            _ => return false,
        }
        true
    }
}

pub fn blend(params: &CrossfadeParams, inputs: &[WeightedGradient]) -> Gradient {
    let inputs = effective_inputs(inputs, params.use_weights);
    if inputs.is_empty() {
        return empty_result(BlendKind::Crossfade);
    }
    if inputs.len() == 1 {
        return clone_result(BlendKind::Crossfade, inputs[0].0);
    }

    let sizes = segment_sizes(&inputs, params.use_weights);
    let boundaries = segment_boundaries(&sizes);

    // Seam regions around each interior boundary.
    struct Seam {
        start: f32,
        end: f32,
        left: usize,
    }
    let mut seams = Vec::with_capacity(inputs.len() - 1);
    for i in 0..inputs.len() - 1 {
        let half = params.overlap * sizes[i].min(sizes[i + 1]) * 0.5;
        if half > 0.0 {
            seams.push(Seam {
                start: boundaries[i + 1] - half,
                end: boundaries[i + 1] + half,
                left: i,
            });
        }
    }

    let seam_at = |position: f32| -> Option<&Seam> {
        seams
            .iter()
            .find(|s| position >= s.start && position <= s.end)
    };
    let sample = |segment: usize, position: f32| -> Rgb {
        if let Some(seam) = seam_at(position) {
            let t = (position - seam.start) / (seam.end - seam.start);
            let a = sample_segment(&inputs, &boundaries, &sizes, seam.left, position);
            let b = sample_segment(&inputs, &boundaries, &sizes, seam.left + 1, position);
            a.lerp(b, t)
        } else {
            sample_segment(&inputs, &boundaries, &sizes, segment, position)
        }
    };

    // Emit stops per segment at the remapped source positions (segment
    // edges included), plus the seam midpoints. With zero overlap this
    // leaves two coincident stops at each boundary: a hard cut.
    let mut stops: Vec<(f32, Rgb)> = Vec::new();
    for (i, (gradient, _)) in inputs.iter().enumerate() {
        let mut locals: Vec<f32> = gradient.stops().iter().map(|s| s.position).collect();
        locals.push(0.0);
        locals.push(1.0);
        locals.sort_by(f32::total_cmp);
        locals.dedup_by(|a, b| (*a - *b).abs() < POSITION_EPSILON);
        for local in locals {
            let p = local.mul_add(sizes[i], boundaries[i]).clamp(0.0, 1.0);
            stops.push((p, sample(i, p)));
        }
    }
    for seam in &seams {
        let mid = (seam.start + seam.end) * 0.5;
        stops.push((seam.start, sample(seam.left, seam.start)));
        stops.push((mid, sample(seam.left, mid)));
        stops.push((seam.end, sample(seam.left + 1, seam.end)));
    }

    finish(BlendKind::Crossfade, stops)
}

/// Sample gradient `index` at a global position, mapped into its local
/// [0, 1] range. Positions outside the segment clamp, matching how the
/// gradient itself clamps beyond its outermost stops.
fn sample_segment(
    inputs: &[WeightedGradient],
    boundaries: &[f32],
    sizes: &[f32],
    index: usize,
    position: f32,
) -> Rgb {
    let size = sizes[index];
    if size <= 0.0 {
        return inputs[index].0.color_at(0.0);
    }
    let local = (position - boundaries[index]) / size;
    inputs[index].0.color_at(local.clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
