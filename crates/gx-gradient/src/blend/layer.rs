//! Layer blend — Photoshop-style compositing.
//!
//! The first input is the base layer; every further input composites on top
//! with one of the eight standard blend-mode formulas, scaled by opacity,
//! its weight, and an optional position mask. Mask noise is seeded, so the
//! same seed always yields the same speckle.

use gx_color::Rgb;

use super::{BlendKind, WeightedGradient, clone_result, empty_result, finish, union_positions};
use crate::gradient::Gradient;
use crate::param::{ParamSpec, find_spec};
use crate::rng::hash_noise;

/// The eight standard blend-mode formulas, per channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Multiply,
    Screen,
    Overlay,
    SoftLight,
    HardLight,
    ColorDodge,
    ColorBurn,
    Difference,
}

impl BlendMode {
    fn from_param(value: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        match value as i32 {
            1 => Self::Screen,
            2 => Self::Overlay,
            3 => Self::SoftLight,
            4 => Self::HardLight,
            5 => Self::ColorDodge,
            6 => Self::ColorBurn,
            7 => Self::Difference,
            _ => Self::Multiply,
        }
    }

    /// Apply the formula to one normalized channel pair.
    fn apply(self, base: f32, layer: f32) -> f32 {
        let v = match self {
            Self::Multiply => base * layer,
            Self::Screen => 1.0 - (1.0 - base) * (1.0 - layer),
            Self::Overlay => {
                if base < 0.5 {
                    2.0 * base * layer
                } else {
                    1.0 - 2.0 * (1.0 - base) * (1.0 - layer)
                }
            }
            Self::SoftLight => {
                if layer < 0.5 {
                    2.0f32.mul_add(-layer, 1.0) * base * base + 2.0 * layer * base
                } else {
                    2.0f32.mul_add(-(1.0 - layer), 1.0) * base * (1.0 - base)
                        + 2.0 * (1.0 - layer) * base
                }
            }
            Self::HardLight => {
                if layer < 0.5 {
                    2.0 * base * layer
                } else {
                    1.0 - 2.0 * (1.0 - base) * (1.0 - layer)
                }
            }
            Self::ColorDodge => {
                if layer < 1.0 {
                    base / (1.0 - layer)
                } else {
                    1.0
                }
            }
            Self::ColorBurn => {
                if layer > 0.0 {
                    1.0 - (1.0 - base) / layer
                } else {
                    0.0
                }
            }
            Self::Difference => (base - layer).abs(),
        };
        v.clamp(0.0, 1.0)
    }

    fn blend_rgb(self, base: Rgb, layer: Rgb) -> Rgb {
        let to_unit = |c: u8| f32::from(c) / 255.0;
        Rgb::from_f32(
            self.apply(to_unit(base.r), to_unit(layer.r)) * 255.0,
            self.apply(to_unit(base.g), to_unit(layer.g)) * 255.0,
            self.apply(to_unit(base.b), to_unit(layer.b)) * 255.0,
        )
    }
}

/// Position mask shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskType {
    None,
    Linear,
    Radial,
    Noise,
}

impl MaskType {
    fn from_param(value: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        match value as i32 {
            1 => Self::Linear,
            2 => Self::Radial,
            3 => Self::Noise,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerParams {
    pub mode: BlendMode,
    /// Overall strength of the composite.
    pub opacity: f32,
    pub mask: MaskType,
    pub mask_invert: bool,
    /// Seed for the noise mask.
    pub seed: u32,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            mode: BlendMode::Multiply,
            opacity: 1.0,
            mask: MaskType::None,
            mask_invert: false,
            seed: 0,
        }
    }
}

impl LayerParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "blend_mode",
            label: "Blend Mode",
            min: 0.0,
            max: 7.0,
            default: 0.0,
            step: 1.0,
            description: "0=Multiply, 1=Screen, 2=Overlay, 3=Soft Light, 4=Hard Light, \
                          5=Color Dodge, 6=Color Burn, 7=Difference",
        },
        ParamSpec {
            key: "opacity",
            label: "Layer Opacity",
            min: 0.0,
            max: 1.0,
            default: 1.0,
            step: 0.05,
            description: "Opacity/strength of the blend effect",
        },
        ParamSpec {
            key: "mask_type",
            label: "Layer Mask",
            min: 0.0,
            max: 3.0,
            default: 0.0,
            step: 1.0,
            description: "Layer mask type: 0=None, 1=Linear, 2=Radial, 3=Noise",
        },
        ParamSpec {
            key: "mask_invert",
            label: "Invert Mask",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            step: 1.0,
            description: "Invert the layer mask",
        },
        ParamSpec {
            key: "seed",
            label: "Noise Seed",
            min: 0.0,
            max: 10000.0,
            default: 0.0,
            step: 1.0,
            description: "Seed for the noise mask",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            "blend_mode" => self.mode = BlendMode::from_param(v),
            "opacity" => self.opacity = v,
            "mask_type" => self.mask = MaskType::from_param(v),
            "mask_invert" => self.mask_invert = ParamSpec::as_bool(v),
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            "seed" => self.seed = v as u32,
            _ => return false,
        }
        true
    }

    /// Mask strength at a position, in [0, 1].
    fn mask_value(&self, position: f32) -> f32 {
        let mask = match self.mask {
            MaskType::None => 1.0,
            MaskType::Linear => position,
            MaskType::Radial => 1.0 - (position - 0.5).abs() * 2.0,
            MaskType::Noise => {
                // Quantize so the mask is a pure function of position.
                #[allow(clippy::cast_possible_truncation)]
                let cell = (position * 1000.0) as i64;
                hash_noise(cell, self.seed)
            }
        };
        if self.mask_invert { 1.0 - mask } else { mask }
    }
}

pub fn blend(params: &LayerParams, inputs: &[WeightedGradient]) -> Gradient {
    if inputs.is_empty() {
        return empty_result(BlendKind::Layer);
    }
    if inputs.len() == 1 {
        return clone_result(BlendKind::Layer, inputs[0].0);
    }

    let base = inputs[0].0;
    let layers = &inputs[1..];
    let positions = union_positions(inputs);

    let mut stops: Vec<(f32, Rgb)> = Vec::with_capacity(positions.len());
    for position in positions {
        let mut color = base.color_at(position);
        for &(layer, weight) in layers {
            let layer_color = layer.color_at(position);
            let blended = params.mode.blend_rgb(color, layer_color);
            let opacity = (params.opacity * weight * params.mask_value(position)).clamp(0.0, 1.0);
            color = color.lerp(blended, opacity);
        }
        stops.push((position, color));
    }
    finish(BlendKind::Layer, stops)
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

    fn solid(color: Rgb) -> Gradient {
        g(&[(0.0, color), (1.0, color)])
    }

    #[test]
    fn multiply_darkens() {
        let out = BlendMode::Multiply.blend_rgb(Rgb::new(200, 100, 50), Rgb::new(128, 128, 128));
        assert!(out.r < 200 && out.g < 100 && out.b < 50);
    }

    #[test]
    fn multiply_by_white_is_identity() {
        let c = Rgb::new(200, 100, 50);
        assert_eq!(BlendMode::Multiply.blend_rgb(c, Rgb::WHITE), c);
    }

    #[test]
    fn screen_lightens() {
        let out = BlendMode::Screen.blend_rgb(Rgb::new(50, 100, 150), Rgb::new(128, 128, 128));
        assert!(out.r > 50 && out.g > 100 && out.b > 150);
    }

    #[test]
    fn screen_with_black_is_identity() {
        let c = Rgb::new(200, 100, 50);
        assert_eq!(BlendMode::Screen.blend_rgb(c, Rgb::BLACK), c);
    }

    #[test]
    fn difference_of_equal_colors_is_black() {
        let c = Rgb::new(77, 150, 220);
        assert_eq!(BlendMode::Difference.blend_rgb(c, c), Rgb::BLACK);
    }

    #[test]
    fn dodge_and_burn_extremes_clamp() {
        // Dodge with a full-white layer saturates, burn with black crushes.
        let c = Rgb::new(100, 100, 100);
        assert_eq!(BlendMode::ColorDodge.blend_rgb(c, Rgb::WHITE), Rgb::WHITE);
        assert_eq!(BlendMode::ColorBurn.blend_rgb(c, Rgb::BLACK), Rgb::BLACK);
    }

    #[test]
    fn zero_opacity_keeps_the_base() {
        let a = solid(Rgb::new(200, 50, 25));
        let b = solid(Rgb::new(0, 0, 255));
        let params = LayerParams {
            opacity: 0.0,
            ..LayerParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        for stop in out.stops() {
            assert_eq!(stop.color, Rgb::new(200, 50, 25));
        }
    }

    #[test]
    fn multiply_composite_darkens_the_base() {
        let a = solid(Rgb::new(200, 200, 200));
        let b = solid(Rgb::new(128, 128, 128));
        let out = blend(&LayerParams::default(), &[(&a, 1.0), (&b, 1.0)]);
        for stop in out.stops() {
            assert!(stop.color.r < 200, "not darkened: {}", stop.color);
        }
    }

    #[test]
    fn linear_mask_fades_the_effect_in() {
        let a = solid(Rgb::new(200, 200, 200));
        let b = g(&[
            (0.0, Rgb::BLACK),
            (0.5, Rgb::BLACK),
            (1.0, Rgb::BLACK),
        ]);
        let params = LayerParams {
            mask: MaskType::Linear,
            ..LayerParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        // Mask is 0 at the left edge (base untouched) and 1 at the right
        // (fully multiplied by black).
        assert_eq!(out.stops()[0].color, Rgb::new(200, 200, 200));
        assert_eq!(out.stops()[out.len() - 1].color, Rgb::BLACK);
    }

    #[test]
    fn noise_mask_is_seeded() {
        let a = g(&[
            (0.0, Rgb::new(200, 200, 200)),
            (0.3, Rgb::new(200, 200, 200)),
            (0.7, Rgb::new(200, 200, 200)),
            (1.0, Rgb::new(200, 200, 200)),
        ]);
        let b = solid(Rgb::BLACK);
        let params = LayerParams {
            mask: MaskType::Noise,
            seed: 7,
            ..LayerParams::default()
        };
        let x = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        let y = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        assert_eq!(x, y);
        let other = LayerParams { seed: 8, ..params };
        let z = blend(&other, &[(&a, 1.0), (&b, 1.0)]);
        assert_ne!(x, z);
    }

    #[test]
    fn single_input_is_clone() {
        let a = solid(Rgb::new(10, 20, 30));
        let out = blend(&LayerParams::default(), &[(&a, 1.0)]);
        assert_eq!(out.stops(), a.stops());
    }
}
