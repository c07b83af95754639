//! Crystal blend — faceted refraction through a simulated crystal.
//!
//! Positions are quantized into facets; within a facet a Snell's-law-like
//! remap bends the sampling position before interpolation, and an internal
//! reflection pass folds a mirrored sample back in. Sampling happens at the
//! union of the original input stop positions, never a uniform resample, so
//! the source structure survives the refraction.

use std::f32::consts::{FRAC_PI_4, TAU};

use gx_color::Rgb;

use super::{BlendKind, WeightedGradient, empty_result, finish, union_positions};
use crate::gradient::Gradient;
use crate::param::{ParamSpec, find_spec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrystalParams {
    /// Size of one facet along the gradient axis.
    pub facet_size: f32,
    /// Refraction index (how strongly light bends).
    pub refraction_index: f32,
    /// Sharpness of facet boundaries: above 0.9 the dominant gradient wins
    /// outright, below that colors are blended.
    pub clarity: f32,
    /// Number of distinct facet angles.
    pub symmetry: u32,
    /// Strength of the mirrored internal reflection pass.
    pub internal_reflection: f32,
}

impl Default for CrystalParams {
    fn default() -> Self {
        Self {
            facet_size: 0.05,
            refraction_index: 1.5,
            clarity: 0.8,
            symmetry: 6,
            internal_reflection: 0.6,
        }
    }
}

impl CrystalParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "facet_size",
            label: "Facet Size",
            min: 0.01,
            max: 0.2,
            default: 0.05,
            step: 0.01,
            description: "Size of individual crystal facets",
        },
        ParamSpec {
            key: "refraction_index",
            label: "Refraction Index",
            min: 1.0,
            max: 2.5,
            default: 1.5,
            step: 0.1,
            description: "Crystal refraction index (affects light bending)",
        },
        ParamSpec {
            key: "clarity",
            label: "Crystal Clarity",
            min: 0.0,
            max: 1.0,
            default: 0.8,
            step: 0.05,
            description: "Crystal clarity (affects color mixing)",
        },
        ParamSpec {
            key: "symmetry",
            label: "Crystal Symmetry",
            min: 3.0,
            max: 8.0,
            default: 6.0,
            step: 1.0,
            description: "Crystal symmetry (number of faces)",
        },
        ParamSpec {
            key: "internal_reflection",
            label: "Internal Reflection",
            min: 0.0,
            max: 1.0,
            default: 0.6,
            step: 0.05,
            description: "Amount of internal reflection within the crystal",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "facet_size" => self.facet_size = v,
            "refraction_index" => self.refraction_index = v,
            "clarity" => self.clarity = v,
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            "symmetry" => self.symmetry = v.round() as u32,
            "internal_reflection" => self.internal_reflection = v,
            _ => return false,
        }
        true
    }
}

pub fn blend(params: &CrystalParams, inputs: &[WeightedGradient]) -> Gradient {
    if inputs.is_empty() {
        return empty_result(BlendKind::Crystal);
    }
    // A single gradient still refracts through its own facets.

    let symmetry = params.symmetry.max(1);
    let facet = params.facet_size.max(0.01);
    let positions = union_positions(inputs);
    let mut stops: Vec<(f32, Rgb)> = Vec::with_capacity(positions.len());

    for position in positions {
        // Facet geometry at this position.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let facet_index = (position / facet) as u32 % symmetry;
        let facet_local = (position % facet) / facet;
        #[allow(clippy::cast_precision_loss)]
        let facet_angle = facet_index as f32 * TAU / symmetry as f32;

        // Simplified Snell's law: the incident angle varies across the
        // facet, the refracted angle bends by the index.
        let incident = facet_local * FRAC_PI_4;
        let refracted = (incident.sin() / params.refraction_index).asin();
        let refraction_offset = (refracted + facet_angle).sin() * facet;

        let mut samples: Vec<(Rgb, f32)> = Vec::with_capacity(inputs.len());
        #[allow(clippy::cast_precision_loss)]
        for (j, &(gradient, weight)) in inputs.iter().enumerate() {
            // Each gradient is a slightly different ray through the crystal.
            let ray_offset = j as f32 * 0.1 / inputs.len() as f32;
            let sample_pos = fold(position + refraction_offset + ray_offset);
            let mut color = gradient.color_at(sample_pos);

            if params.internal_reflection > 0.0 {
                // The mirrored ray: refraction applied in the opposite
                // direction, folded back into range.
                let mirrored = fold(position - refraction_offset - ray_offset);
                let reflection = gradient.color_at(mirrored);
                color = color.lerp(reflection, params.internal_reflection * 0.5);
            }
            samples.push((color, weight));
        }

        let color = if params.clarity > 0.9 {
            // Sharp facets: the heaviest gradient wins outright.
            samples
                .iter()
                .fold(samples[0], |best, &s| if s.1 > best.1 { s } else { best })
                .0
        } else {
            let clarity_weight = (1.0 - params.clarity).mul_add(0.5, params.clarity);
            super::weighted_mean(samples.iter().map(|&(c, w)| (c, w * clarity_weight)))
                .unwrap_or(samples[0].0)
        };
        stops.push((position, color));
    }
    finish(BlendKind::Crystal, stops)
}

/// Mirror a position back into [0, 1] (triangle fold).
fn fold(position: f32) -> f32 {
    if (0.0..=1.0).contains(&position) {
        return position;
    }
    let wrapped = position.rem_euclid(2.0);
    if wrapped > 1.0 { 2.0 - wrapped } else { wrapped }
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
    fn fold_mirrors_into_range() {
        assert!((fold(0.3) - 0.3).abs() < 1e-6);
        assert!((fold(1.2) - 0.8).abs() < 1e-6);
        assert!((fold(-0.2) - 0.2).abs() < 1e-6);
        assert!((fold(2.3) - 0.3).abs() < 1e-6);
        for i in -30..30 {
            #[allow(clippy::cast_precision_loss)]
            let p = i as f32 * 0.17;
            assert!((0.0..=1.0).contains(&fold(p)), "fold({p}) out of range");
        }
    }

    #[test]
    fn positions_preserved() {
        let a = g(&[
            (0.0, Rgb::new(255, 0, 0)),
            (0.33, Rgb::new(0, 255, 0)),
            (1.0, Rgb::new(0, 0, 255)),
        ]);
        let b = g(&[(0.5, Rgb::WHITE)]);
        let out = blend(&CrystalParams::default(), &[(&a, 1.0), (&b, 1.0)]);
        let positions: Vec<f32> = out.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.33, 0.5, 1.0]);
    }

    #[test]
    fn high_clarity_picks_dominant_gradient() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(0, 0, 255))]);
        let params = CrystalParams {
            clarity: 1.0,
            internal_reflection: 0.0,
            ..CrystalParams::default()
        };
        let out = blend(&params, &[(&a, 5.0), (&b, 1.0)]);
        for stop in out.stops() {
            assert_eq!(stop.color, Rgb::new(255, 0, 0));
        }
    }

    #[test]
    fn low_clarity_blends() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(255, 0, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(0, 0, 255))]);
        let params = CrystalParams {
            clarity: 0.2,
            ..CrystalParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        for stop in out.stops() {
            assert!(stop.color.r > 0 && stop.color.b > 0, "no blend: {}", stop.color);
        }
    }

    #[test]
    fn single_gradient_refracts_itself() {
        let a = g(&[
            (0.0, Rgb::new(255, 0, 0)),
            (0.5, Rgb::new(0, 255, 0)),
            (1.0, Rgb::new(0, 0, 255)),
        ]);
        let out = blend(&CrystalParams::default(), &[(&a, 1.0)]);
        // Positions survive, colors get bent.
        assert_eq!(out.len(), a.len());
        for (got, want) in out.stops().iter().zip(a.stops()) {
            assert!((got.position - want.position).abs() < 1e-6);
        }
    }

    #[test]
    fn deterministic() {
        let a = g(&[(0.0, Rgb::new(255, 0, 0)), (1.0, Rgb::new(0, 255, 0))]);
        let b = g(&[(0.0, Rgb::new(0, 0, 255)), (1.0, Rgb::new(255, 255, 0))]);
        let params = CrystalParams::default();
        assert_eq!(
            blend(&params, &[(&a, 1.0), (&b, 1.0)]),
            blend(&params, &[(&a, 1.0), (&b, 1.0)])
        );
    }
}
