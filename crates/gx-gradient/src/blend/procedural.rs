//! Procedural blend — a seeded pattern function drives the mix.
//!
//! A pattern value in [0, 1] is computed per position from a selectable
//! function; with two or more inputs it is the mix factor between the first
//! two gradients' colors, with a single input it becomes a multiplicative
//! tint on that gradient's own colors. All stochastic patterns derive from
//! the explicit seed, never from global random state.

use std::f32::consts::TAU;

use gx_color::Rgb;

use super::{BlendKind, WeightedGradient, empty_result, finish, result_name, union_positions};
use crate::gradient::{ColorStop, Gradient};
use crate::param::{ParamSpec, find_spec};
use crate::rng::hash_noise;

/// The selectable pattern functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Sine,
    Sawtooth,
    Noise,
    /// Multi-octave sum of sines.
    Fractal,
    /// Multi-octave value noise with per-octave phase jitter.
    Jitter,
}

impl Pattern {
    fn from_param(value: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        match value as i32 {
            1 => Self::Sawtooth,
            2 => Self::Noise,
            3 => Self::Fractal,
            4 => Self::Jitter,
            _ => Self::Sine,
        }
    }
}

const OCTAVES: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProceduralParams {
    pub pattern: Pattern,
    /// Base cycles across the [0, 1] range.
    pub frequency: f32,
    /// Pattern contrast around the 0.5 midpoint.
    pub amplitude: f32,
    /// Phase offset in degrees.
    pub phase: f32,
    /// Seed for the stochastic patterns.
    pub seed: u32,
}

impl Default for ProceduralParams {
    fn default() -> Self {
        Self {
            pattern: Pattern::Sine,
            frequency: 2.0,
            amplitude: 1.0,
            phase: 0.0,
            seed: 0,
        }
    }
}

impl ProceduralParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "pattern",
            label: "Pattern",
            min: 0.0,
            max: 4.0,
            default: 0.0,
            step: 1.0,
            description: "0=Sine, 1=Sawtooth, 2=Noise, 3=Fractal Sines, 4=Jittered Noise",
        },
        ParamSpec {
            key: "frequency",
            label: "Frequency",
            min: 0.5,
            max: 10.0,
            default: 2.0,
            step: 0.1,
            description: "Base pattern cycles across the gradient",
        },
        ParamSpec {
            key: "amplitude",
            label: "Amplitude",
            min: 0.0,
            max: 1.0,
            default: 1.0,
            step: 0.05,
            description: "Pattern contrast around the midpoint",
        },
        ParamSpec {
            key: "phase",
            label: "Phase",
            min: 0.0,
            max: 360.0,
            default: 0.0,
            step: 1.0,
            description: "Phase offset in degrees",
        },
        ParamSpec {
            key: "seed",
            label: "Seed",
            min: 0.0,
            max: 10000.0,
            default: 0.0,
            step: 1.0,
            description: "Seed for the stochastic patterns",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "pattern" => self.pattern = Pattern::from_param(v),
            "frequency" => self.frequency = v,
            "amplitude" => self.amplitude = v,
            "phase" => self.phase = v,
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            "seed" => self.seed = v as u32,
            _ => return false,
        }
        true
    }

    /// Pattern value at a position, in [0, 1].
    #[must_use]
    pub fn value(&self, position: f32) -> f32 {
        let phase = self.phase.to_radians();
        let raw = match self.pattern {
            Pattern::Sine => (position * self.frequency)
                .mul_add(TAU, phase)
                .sin()
                .mul_add(0.5, 0.5),
            Pattern::Sawtooth => (self.frequency.mul_add(position, phase / TAU)).fract(),
            Pattern::Noise => value_noise(position * self.frequency, self.seed),
            Pattern::Fractal => {
                let mut sum = 0.0f32;
                let mut norm = 0.0f32;
                for octave in 0..OCTAVES {
                    #[allow(clippy::cast_precision_loss)]
                    let scale = (1 << octave) as f32;
                    #[allow(clippy::cast_possible_wrap)]
                    let amp = 0.5f32.powi(octave as i32);
                    #[allow(clippy::cast_precision_loss)]
                    let angle =
                        (position * self.frequency * scale).mul_add(TAU, phase + octave as f32);
                    sum = angle.sin().mul_add(amp, sum);
                    norm += amp;
                }
                (sum / norm).mul_add(0.5, 0.5)
            }
            Pattern::Jitter => {
                let mut sum = 0.0f32;
                let mut norm = 0.0f32;
                for octave in 0..OCTAVES {
                    #[allow(clippy::cast_precision_loss)]
                    let scale = (1 << octave) as f32;
                    #[allow(clippy::cast_possible_wrap)]
                    let amp = 0.5f32.powi(octave as i32);
                    // Per-octave phase jitter, itself seeded.
                    let jitter =
                        hash_noise(i64::from(octave), self.seed.wrapping_add(0x51ab)) * 10.0;
                    let x = (position * self.frequency).mul_add(scale, jitter);
                    sum = value_noise(x, self.seed.wrapping_add(octave)).mul_add(amp, sum);
                    norm += amp;
                }
                sum / norm
            }
        };
        // Amplitude scales the swing around the midpoint.
        (raw - 0.5).mul_add(self.amplitude, 0.5).clamp(0.0, 1.0)
    }
}

/// Smooth 1-D value noise: hash noise at the lattice points, smoothstepped
/// in between.
fn value_noise(x: f32, seed: u32) -> f32 {
    #[allow(clippy::cast_possible_truncation)]
    let cell = x.floor() as i64;
    let t = x - x.floor();
    let t = t * t * 2.0f32.mul_add(-t, 3.0);
    let a = hash_noise(cell, seed);
    let b = hash_noise(cell + 1, seed);
    (b - a).mul_add(t, a)
}

pub fn blend(params: &ProceduralParams, inputs: &[WeightedGradient]) -> Gradient {
    if inputs.is_empty() {
        return empty_result(BlendKind::Procedural);
    }
    if inputs.len() == 1 {
        return tint(params, inputs[0].0);
    }

    // The pattern mixes the first two gradients; weights and any further
    // inputs only contribute their stop positions.
    let a = inputs[0].0;
    let b = inputs[1].0;
    let positions = union_positions(inputs);
    let stops = positions
        .into_iter()
        .map(|p| (p, a.color_at(p).lerp(b.color_at(p), params.value(p))))
        .collect();
    finish(BlendKind::Procedural, stops)
}

/// Single-gradient form: the pattern value becomes a multiplicative tint on
/// the gradient's own stops.
fn tint(params: &ProceduralParams, gradient: &Gradient) -> Gradient {
    let mut result = Gradient::new(result_name(BlendKind::Procedural));
    for stop in gradient.stops() {
        let v = params.value(stop.position);
        let color = Rgb::from_f32(
            f32::from(stop.color.r) * v,
            f32::from(stop.color.g) * v,
            f32::from(stop.color.b) * v,
        );
        result.push_stop(ColorStop::new(stop.position, color));
    }
    result.sort_stops();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
