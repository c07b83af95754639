//! Waveform blend — wave interference between the inputs.
//!
//! Each gradient is a wave source with its own frequency and phase; at each
//! sample position the wave values modulate how strongly that gradient's
//! color contributes. Constructive interference biases the mix toward one
//! gradient, destructive interference pulls it toward a midpoint.

use std::f32::consts::{PI, TAU};

use gx_color::Rgb;

use super::{BlendKind, WeightedGradient, empty_result, finish, result_name, union_positions};
use crate::gradient::{ColorStop, Gradient};
use crate::param::{ParamSpec, find_spec};

/// Periodic wave functions, all with range [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveShape {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl WaveShape {
    fn from_param(value: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        match value as i32 {
            1 => Self::Square,
            2 => Self::Triangle,
            3 => Self::Sawtooth,
            _ => Self::Sine,
        }
    }

    /// Evaluate the wave at an angle in radians.
    fn eval(self, angle: f32) -> f32 {
        match self {
            Self::Sine => angle.sin(),
            Self::Square => {
                if angle.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => (2.0 / PI) * angle.sin().asin(),
            Self::Sawtooth => 2.0 * (angle / TAU - (angle / TAU + 0.5).floor()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformParams {
    /// Wave function shared by all sources.
    pub shape: WaveShape,
    /// Frequency relationship between successive gradients.
    pub frequency_ratio: f32,
    /// Phase shift between successive gradients, in degrees.
    pub phase_shift: f32,
    /// Strength of the interference modulation.
    pub interference: f32,
    /// Amplitude of the wave patterns.
    pub amplitude: f32,
}

impl Default for WaveformParams {
    fn default() -> Self {
        Self {
            shape: WaveShape::Sine,
            frequency_ratio: 1.0,
            phase_shift: 0.0,
            interference: 0.7,
            amplitude: 1.0,
        }
    }
}

impl WaveformParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "wave_type",
            label: "Wave Type",
            min: 0.0,
            max: 3.0,
            default: 0.0,
            step: 1.0,
            description: "Wave function: 0=Sine, 1=Square, 2=Triangle, 3=Sawtooth",
        },
        ParamSpec {
            key: "frequency_ratio",
            label: "Frequency Ratio",
            min: 0.5,
            max: 4.0,
            default: 1.0,
            step: 0.1,
            description: "Frequency relationship between gradients",
        },
        ParamSpec {
            key: "phase_shift",
            label: "Phase Shift",
            min: 0.0,
            max: 360.0,
            default: 0.0,
            step: 1.0,
            description: "Phase shift between waves in degrees",
        },
        ParamSpec {
            key: "interference",
            label: "Interference Strength",
            min: 0.0,
            max: 1.0,
            default: 0.7,
            step: 0.05,
            description: "Strength of wave interference effects",
        },
        ParamSpec {
            key: "amplitude",
            label: "Wave Amplitude",
            min: 0.1,
            max: 2.0,
            default: 1.0,
            step: 0.1,
            description: "Amplitude of the wave patterns",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "wave_type" => self.shape = WaveShape::from_param(v),
            "frequency_ratio" => self.frequency_ratio = v,
            "phase_shift" => self.phase_shift = v,
            "interference" => self.interference = v,
            "amplitude" => self.amplitude = v,
            _ => return false,
        }
        true
    }

    /// Wave value for source `j` at `position`: source j runs at frequency
    /// `1 + j * ratio` with phase `j * shift`.
    fn wave(&self, j: usize, position: f32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let frequency = (j as f32).mul_add(self.frequency_ratio, 1.0);
        #[allow(clippy::cast_precision_loss)]
        let phase = j as f32 * self.phase_shift.to_radians();
        let angle = (position * frequency).mul_add(TAU, phase);
        self.shape.eval(angle)
    }
}

pub fn blend(params: &WaveformParams, inputs: &[WeightedGradient]) -> Gradient {
    if inputs.is_empty() {
        return empty_result(BlendKind::Waveform);
    }
    if inputs.len() == 1 {
        return self_interference(params, inputs[0].0);
    }

    let positions = union_positions(inputs);
    let mut stops: Vec<(f32, Rgb)> = Vec::with_capacity(positions.len());
    for position in positions {
        let mut wave_sum = 0.0f32;
        let mut samples: Vec<(Rgb, f32)> = Vec::with_capacity(inputs.len());
        for (j, &(gradient, weight)) in inputs.iter().enumerate() {
            let wave = params.wave(j, position) * params.amplitude * weight;
            wave_sum += wave.abs();
            samples.push((gradient.color_at(position), wave));
        }

        let color = if wave_sum > 0.0 {
            // Positive wave values push a source's contribution up, negative
            // values suppress it; interference scales the swing.
            let contributions = samples.iter().map(|&(color, wave)| {
                let c = wave.mul_add(params.interference, 1.0) / 2.0;
                (color, c.clamp(0.0, 1.0))
            });
            super::weighted_mean(contributions).unwrap_or(samples[0].0)
        } else {
            samples[0].0
        };
        stops.push((position, color));
    }
    finish(BlendKind::Waveform, stops)
}

/// Single-gradient waveform: the gradient interferes with itself. Each stop
/// keeps its position but its color shifts toward the color at a
/// wave-displaced sample position, by the interference strength.
fn self_interference(params: &WaveformParams, gradient: &Gradient) -> Gradient {
    let mut result = Gradient::new(result_name(BlendKind::Waveform));
    for stop in gradient.stops() {
        let wave = params.wave(0, stop.position).clamp(-1.0, 1.0);
        let displaced = (wave * params.amplitude).mul_add(0.05, stop.position);
        let sampled = gradient.color_at(displaced.clamp(0.0, 1.0));
        let color = stop.color.lerp(sampled, params.interference);
        result.push_stop(ColorStop::new(stop.position, color));
    }
    result.sort_stops();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::ColorStop;

    fn g(stops: &[(f32, Rgb)]) -> Gradient {
        Gradient::from_stops(
            "g",
            stops.iter().map(|&(p, c)| ColorStop::new(p, c)).collect(),
        )
    }

    #[test]
    fn shapes_stay_in_unit_swing() {
        for shape in [
            WaveShape::Sine,
            WaveShape::Square,
            WaveShape::Triangle,
            WaveShape::Sawtooth,
        ] {
            for i in 0..=100 {
                #[allow(clippy::cast_precision_loss)]
                let angle = i as f32 * 0.37;
                let v = shape.eval(angle);
                assert!((-1.0..=1.0).contains(&v), "{shape:?}({angle}) = {v}");
            }
        }
    }

    #[test]
    fn output_positions_match_union() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.5, Rgb::new(0, 0, 255))]);
        let out = blend(&WaveformParams::default(), &[(&a, 1.0), (&b, 1.0)]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn zero_interference_is_plain_average() {
        // Positions away from whole wave periods, where the wave sum is
        // nonzero (a zero sum falls back to the first gradient's color).
        let a = g(&[(0.2, Rgb::new(255, 0, 0)), (0.7, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.2, Rgb::new(0, 0, 255)), (0.7, Rgb::new(0, 0, 255))]);
        let params = WaveformParams {
            interference: 0.0,
            ..WaveformParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        // All contributions collapse to 0.5, so every stop is the plain mean.
        for stop in out.stops() {
            assert!(stop.color.r.abs_diff(128) <= 1, "got {}", stop.color);
            assert!(stop.color.b.abs_diff(128) <= 1, "got {}", stop.color);
        }
    }

    #[test]
    fn interference_modulates_the_mix() {
        let a = g(&[
            (0.0, Rgb::new(255, 0, 0)),
            (0.1, Rgb::new(255, 0, 0)),
            (0.2, Rgb::new(255, 0, 0)),
            (0.3, Rgb::new(255, 0, 0)),
            (1.0, Rgb::new(255, 0, 0)),
        ]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(0, 0, 255))]);
        let out = blend(&WaveformParams::default(), &[(&a, 1.0), (&b, 1.0)]);
        // Not every stop can be the flat 50/50 mean once waves modulate.
        let any_biased = out
            .stops()
            .iter()
            .any(|s| s.color.r.abs_diff(128) > 8 || s.color.b.abs_diff(128) > 8);
        assert!(any_biased, "interference had no effect");
    }

    #[test]
    fn single_input_keeps_positions() {
        let a = g(&[
            (0.0, Rgb::BLACK),
            (0.25, Rgb::new(255, 0, 0)),
            (1.0, Rgb::WHITE),
        ]);
        let out = blend(&WaveformParams::default(), &[(&a, 1.0)]);
        assert_eq!(out.len(), a.len());
        for (got, want) in out.stops().iter().zip(a.stops()) {
            assert!((got.position - want.position).abs() < 1e-6);
        }
    }

    #[test]
    fn deterministic() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(0, 255, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(255, 255, 0))]);
        let params = WaveformParams::default();
        let x = blend(&params, &[(&a, 1.0), (&b, 2.0)]);
        let y = blend(&params, &[(&a, 1.0), (&b, 2.0)]);
        assert_eq!(x, y);
    }
}
