//! Mix blend — weighted color average at every stop position.
//!
//! Samples every input at the union of all stop positions and averages the
//! colors, weighted. RGB averaging is a plain per-channel mean; HSV
//! averaging treats hue as circular (vector mean of the hue angles) so
//! red-ish inputs never average through cyan.

use gx_color::{HueMean, Rgb, hsv_to_rgb, rgb_to_hsv};

use super::{
    BlendKind, WeightedGradient, clone_result, effective_inputs, empty_result, finish,
    union_positions, weighted_mean,
};
use crate::gradient::Gradient;
use crate::param::{ParamSpec, find_spec};

/// Color space the average runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixSpace {
    Rgb,
    Hsv,
}

impl MixSpace {
    fn from_param(value: f32) -> Self {
        if ParamSpec::as_bool(value) {
            Self::Hsv
        } else {
            Self::Rgb
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixParams {
    /// Weight the average by gradient weight (equal weights otherwise).
    pub use_weights: bool,
    /// Which color space to average in.
    pub space: MixSpace,
}

impl Default for MixParams {
    fn default() -> Self {
        Self {
            use_weights: true,
            space: MixSpace::Rgb,
        }
    }
}

impl MixParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "use_weights",
            label: "Use Weights",
            min: 0.0,
            max: 1.0,
            default: 1.0,
            step: 1.0,
            description: "Weight the color average by gradient weight",
        },
        ParamSpec {
            key: "color_space",
            label: "Color Space",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            step: 1.0,
            description: "0 = RGB averaging, 1 = HSV with circular hue",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "use_weights" => self.use_weights = ParamSpec::as_bool(v),
            "color_space" => self.space = MixSpace::from_param(v),
            _ => return false,
        }
        true
    }
}

pub fn blend(params: &MixParams, inputs: &[WeightedGradient]) -> Gradient {
    let inputs = effective_inputs(inputs, params.use_weights);
    if inputs.is_empty() {
        return empty_result(BlendKind::Mix);
    }
    if inputs.len() == 1 {
        return clone_result(BlendKind::Mix, inputs[0].0);
    }

    let positions = union_positions(&inputs);
    let mut stops = Vec::with_capacity(positions.len());
    for position in positions {
        let color = match params.space {
            MixSpace::Rgb => mix_rgb(&inputs, position, params.use_weights),
            MixSpace::Hsv => mix_hsv(&inputs, position, params.use_weights),
        };
        stops.push((position, color));
    }
    finish(BlendKind::Mix, stops)
}

fn mix_rgb(inputs: &[WeightedGradient], position: f32, use_weights: bool) -> Rgb {
    let samples = inputs.iter().map(|&(g, w)| {
        let weight = if use_weights { w } else { 1.0 };
        (g.color_at(position), weight)
    });
    // Zero total weight cannot happen after filtering, but the fallback is
    // the first gradient's own color rather than black.
    weighted_mean(samples).unwrap_or_else(|| inputs[0].0.color_at(position))
}

fn mix_hsv(inputs: &[WeightedGradient], position: f32, use_weights: bool) -> Rgb {
    let mut hue = HueMean::new();
    let mut s_sum = 0.0f32;
    let mut v_sum = 0.0f32;
    let mut total = 0.0f32;
    for &(gradient, w) in inputs {
        let weight = if use_weights { w.max(0.0) } else { 1.0 };
        if weight <= 0.0 {
            continue;
        }
        let (h, s, v) = rgb_to_hsv(gradient.color_at(position));
        // Gray samples carry no hue information; only saturated colors
        // contribute to the circular mean.
        if s > 0.0 {
            hue.add(h, weight * s);
        }
        s_sum = s.mul_add(weight, s_sum);
        v_sum = v.mul_add(weight, v_sum);
        total += weight;
    }
    if total <= 0.0 {
        return inputs[0].0.color_at(position);
    }
    let h = hue.mean().unwrap_or(0.0);
    hsv_to_rgb(h, s_sum / total, v_sum / total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
