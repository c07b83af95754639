//! Chromatic blend — per-channel position offsets, like light through a
//! prism.
//!
//! Each RGB channel is sampled from a position-shifted copy of the inputs:
//! red at `position + red_offset`, green and blue likewise, with a prism
//! term that widens the split toward the middle of the range. Works on a
//! single gradient too, fringing its own stops in place.

use std::f32::consts::PI;

use gx_color::Rgb;

use super::{BlendKind, WeightedGradient, empty_result, finish, union_positions};
use crate::gradient::Gradient;
use crate::param::{ParamSpec, find_spec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaticParams {
    /// Position offset for the red channel.
    pub red_offset: f32,
    /// Position offset for the green channel.
    pub green_offset: f32,
    /// Position offset for the blue channel.
    pub blue_offset: f32,
    /// Scales all channel offsets.
    pub dispersion: f32,
    /// Prism angle in degrees; widens the red/blue split mid-range.
    pub prism_angle: f32,
}

impl Default for ChromaticParams {
    fn default() -> Self {
        Self {
            red_offset: 0.01,
            green_offset: 0.0,
            blue_offset: -0.01,
            dispersion: 0.5,
            prism_angle: 15.0,
        }
    }
}

impl ChromaticParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "red_offset",
            label: "Red Channel Offset",
            min: -0.1,
            max: 0.1,
            default: 0.01,
            step: 0.005,
            description: "Position offset for the red color channel",
        },
        ParamSpec {
            key: "green_offset",
            label: "Green Channel Offset",
            min: -0.1,
            max: 0.1,
            default: 0.0,
            step: 0.005,
            description: "Position offset for the green color channel",
        },
        ParamSpec {
            key: "blue_offset",
            label: "Blue Channel Offset",
            min: -0.1,
            max: 0.1,
            default: -0.01,
            step: 0.005,
            description: "Position offset for the blue color channel",
        },
        ParamSpec {
            key: "dispersion",
            label: "Chromatic Dispersion",
            min: 0.0,
            max: 1.0,
            default: 0.5,
            step: 0.05,
            description: "Amount of chromatic dispersion effect",
        },
        ParamSpec {
            key: "prism_angle",
            label: "Prism Angle",
            min: 0.0,
            max: 45.0,
            default: 15.0,
            step: 1.0,
            description: "Angle of light dispersion in degrees",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "red_offset" => self.red_offset = v,
            "green_offset" => self.green_offset = v,
            "blue_offset" => self.blue_offset = v,
            "dispersion" => self.dispersion = v,
            "prism_angle" => self.prism_angle = v,
            _ => return false,
        }
        true
    }

    /// The three channel sampling positions for a stop position, wrapped
    /// into [0, 1).
    fn channel_positions(&self, position: f32) -> (f32, f32, f32) {
        let red = self.red_offset.mul_add(self.dispersion, position);
        let green = self.green_offset.mul_add(self.dispersion, position);
        let blue = self.blue_offset.mul_add(self.dispersion, position);

        // Strongest split mid-range, none at the endpoints.
        let prism = (position * PI).sin() * self.prism_angle.to_radians().sin();
        let red = prism.mul_add(0.02, red);
        let blue = prism.mul_add(-0.02, blue);

        (wrap(red), wrap(green), wrap(blue))
    }
}

/// Wrap a position into [0, 1], leaving in-range values (including exactly
/// 1.0) untouched.
fn wrap(position: f32) -> f32 {
    if (0.0..=1.0).contains(&position) {
        position
    } else {
        position.rem_euclid(1.0)
    }
}

pub fn blend(params: &ChromaticParams, inputs: &[WeightedGradient]) -> Gradient {
    if inputs.is_empty() {
        return empty_result(BlendKind::Chromatic);
    }
    // A single gradient fringes its own stops through the same path.

    let positions = union_positions(inputs);
    let mut stops: Vec<(f32, Rgb)> = Vec::with_capacity(positions.len());
    for position in positions {
        let (red_pos, green_pos, blue_pos) = params.channel_positions(position);

        let mut r = 0.0f32;
        let mut g = 0.0f32;
        let mut b = 0.0f32;
        let mut total = 0.0f32;
        for &(gradient, weight) in inputs {
            let w = weight.max(0.0);
            r = f32::from(gradient.color_at(red_pos).r).mul_add(w, r);
            g = f32::from(gradient.color_at(green_pos).g).mul_add(w, g);
            b = f32::from(gradient.color_at(blue_pos).b).mul_add(w, b);
            total += w;
        }
        let color = if total > 0.0 {
            Rgb::from_f32(r / total, g / total, b / total)
        } else {
            inputs[0].0.color_at(position)
        };
        stops.push((position, color));
    }
    finish(BlendKind::Chromatic, stops)
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
    fn zero_offsets_zero_prism_is_identity_sampling() {
        let a = g(&[
            (0.0, Rgb::new(10, 20, 30)),
            (0.5, Rgb::new(200, 100, 50)),
            (1.0, Rgb::new(250, 240, 230)),
        ]);
        let params = ChromaticParams {
            red_offset: 0.0,
            green_offset: 0.0,
            blue_offset: 0.0,
            prism_angle: 0.0,
            ..ChromaticParams::default()
        };
        let out = blend(&params, &[(&a, 1.0)]);
        for (got, want) in out.stops().iter().zip(a.stops()) {
            assert_eq!(got.color, want.color, "at {}", want.position);
        }
    }

    #[test]
    fn offsets_fringe_a_sharp_edge() {
        // Hard black-to-white cut at 0.5; offsetting red and blue sampling
        // in opposite directions splits the channels near the edge.
        let a = g(&[
            (0.0, Rgb::BLACK),
            (0.49, Rgb::BLACK),
            (0.51, Rgb::WHITE),
            (1.0, Rgb::WHITE),
        ]);
        let params = ChromaticParams {
            red_offset: 0.1,
            green_offset: 0.0,
            blue_offset: -0.1,
            dispersion: 1.0,
            prism_angle: 0.0,
            ..ChromaticParams::default()
        };
        let out = blend(&params, &[(&a, 1.0)]);
        let near_edge = out
            .stops()
            .iter()
            .find(|s| (s.position - 0.49).abs() < 1e-6)
            .copied()
            .unwrap();
        // Red samples ahead of the cut (white side), blue behind (black).
        assert!(
            near_edge.color.r > near_edge.color.b,
            "no fringe: {}",
            near_edge.color
        );
    }

    #[test]
    fn positions_never_move() {
        let a = g(&[(0.0, Rgb::BLACK), (0.4, Rgb::MID_GRAY), (1.0, Rgb::WHITE)]);
        let b = g(&[(0.6, Rgb::new(255, 0, 0))]);
        let out = blend(&ChromaticParams::default(), &[(&a, 1.0), (&b, 1.0)]);
        let positions: Vec<f32> = out.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn weighted_two_gradient_fringe_is_deterministic() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(0, 255, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(255, 255, 0))]);
        let params = ChromaticParams::default();
        assert_eq!(
            blend(&params, &[(&a, 2.0), (&b, 1.0)]),
            blend(&params, &[(&a, 2.0), (&b, 1.0)])
        );
    }
}
