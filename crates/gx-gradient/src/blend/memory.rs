//! Memory blend — echo and trailing effects.
//!
//! Walks the sample positions left to right keeping a bounded FIFO of the
//! colors it already produced; each new color is pulled toward a decayed
//! average of that memory. Low feedback gives a faint trail, high feedback
//! smears earlier colors far to the right.

use gx_color::Rgb;

use super::{
    BlendKind, WeightedGradient, clone_result, empty_result, finish, union_positions,
    weighted_mean,
};
use crate::gradient::Gradient;
use crate::param::{ParamSpec, find_spec};

/// How memory entries fade with age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayMode {
    Linear,
    Exponential,
    Oscillating,
}

impl DecayMode {
    fn from_param(value: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        match value as i32 {
            1 => Self::Exponential,
            2 => Self::Oscillating,
            _ => Self::Linear,
        }
    }

    /// Weight of a memory entry of the given index age.
    fn weight(self, age: f32, memory_length: f32, decay_rate: f32) -> f32 {
        match self {
            Self::Linear => (age / memory_length).mul_add(-decay_rate, 1.0).max(0.0),
            Self::Exponential => (-age * decay_rate).exp(),
            Self::Oscillating => {
                (-age * decay_rate * 0.5).exp()
                    * (age * std::f32::consts::FRAC_PI_2).sin().mul_add(0.5, 1.0)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryParams {
    /// Number of previous samples remembered.
    pub memory_length: usize,
    /// How fast memories fade (higher decays faster).
    pub decay_rate: f32,
    /// How strongly memory pulls on the current color.
    pub feedback: f32,
    /// Extra attenuation on everything but the newest memory.
    pub echo_strength: f32,
    pub mode: DecayMode,
}

impl Default for MemoryParams {
    fn default() -> Self {
        Self {
            memory_length: 5,
            decay_rate: 0.7,
            feedback: 0.3,
            echo_strength: 0.5,
            mode: DecayMode::Linear,
        }
    }
}

impl MemoryParams {
    pub const SPECS: &'static [ParamSpec] = &[
        ParamSpec {
            key: "memory_length",
            label: "Memory Length",
            min: 2.0,
            max: 20.0,
            default: 5.0,
            step: 1.0,
            description: "Number of previous samples to remember",
        },
        ParamSpec {
            key: "decay_rate",
            label: "Memory Decay Rate",
            min: 0.1,
            max: 0.9,
            default: 0.7,
            step: 0.05,
            description: "Rate at which memories fade (higher = faster decay)",
        },
        ParamSpec {
            key: "feedback",
            label: "Memory Feedback",
            min: 0.0,
            max: 1.0,
            default: 0.3,
            step: 0.05,
            description: "Amount of feedback from memory to the current color",
        },
        ParamSpec {
            key: "echo_strength",
            label: "Echo Strength",
            min: 0.0,
            max: 1.0,
            default: 0.5,
            step: 0.05,
            description: "Strength of echo effects in the memory",
        },
        ParamSpec {
            key: "memory_mode",
            label: "Memory Mode",
            min: 0.0,
            max: 2.0,
            default: 0.0,
            step: 1.0,
            description: "Memory behavior: 0=Linear Decay, 1=Exponential, 2=Oscillating",
        },
    ];

    pub fn set(&mut self, key: &str, value: f32) -> bool {
        let Some(spec) = find_spec(Self::SPECS, key) else {
            return false;
        };
        let v = spec.clamp(value);
        match key {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            "memory_length" => self.memory_length = v.round() as usize,
            "decay_rate" => self.decay_rate = v,
            "feedback" => self.feedback = v,
            "echo_strength" => self.echo_strength = v,
            "memory_mode" => self.mode = DecayMode::from_param(v),
            _ => return false,
        }
        true
    }
}

pub fn blend(params: &MemoryParams, inputs: &[WeightedGradient]) -> Gradient {
    if inputs.is_empty() {
        return empty_result(BlendKind::Memory);
    }
    if inputs.len() == 1 {
        return clone_result(BlendKind::Memory, inputs[0].0);
    }

    let memory_length = params.memory_length.max(1);
    let positions = union_positions(inputs);
    let mut memory: Vec<Rgb> = Vec::with_capacity(memory_length);
    let mut stops: Vec<(f32, Rgb)> = Vec::with_capacity(positions.len());

    for position in positions {
        let current = weighted_mean(
            inputs.iter().map(|&(g, w)| (g.color_at(position), w)),
        )
        .unwrap_or_else(|| inputs[0].0.color_at(position));

        let color = if memory.is_empty() {
            current
        } else {
            let echo = recall(&memory, params, memory_length);
            current.lerp(echo, params.feedback)
        };

        memory.push(color);
        if memory.len() > memory_length {
            memory.remove(0);
        }
        stops.push((position, color));
    }
    finish(BlendKind::Memory, stops)
}

/// Decay-weighted average of the memory buffer. The newest entry keeps its
/// full decay weight; older entries are additionally scaled by the echo
/// strength.
fn recall(memory: &[Rgb], params: &MemoryParams, memory_length: usize) -> Rgb {
    let newest = memory.len() - 1;
    #[allow(clippy::cast_precision_loss)]
    let samples = memory.iter().enumerate().map(|(i, &color)| {
        let age = (newest - i) as f32;
        let mut weight = params
            .mode
            .weight(age, memory_length as f32, params.decay_rate);
        if i < newest {
            weight *= params.echo_strength;
        }
        (color, weight)
    });
    weighted_mean(samples).unwrap_or(memory[newest])
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

    fn many_stops(color: Rgb) -> Gradient {
        let stops: Vec<(f32, Rgb)> = (0..10)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let p = i as f32 / 9.0;
                (p, color)
            })
            .collect();
        g(&stops)
    }

    #[test]
    fn decay_weights_decrease_with_age() {
        for mode in [DecayMode::Linear, DecayMode::Exponential] {
            let w0 = mode.weight(0.0, 5.0, 0.7);
            let w3 = mode.weight(3.0, 5.0, 0.7);
            assert!(w0 > w3, "{mode:?} did not decay");
        }
    }

    #[test]
    fn linear_decay_bottoms_out_at_zero() {
        assert!(DecayMode::Linear.weight(100.0, 5.0, 0.9) >= 0.0);
    }

    #[test]
    fn zero_feedback_is_plain_mix() {
        let a = many_stops(Rgb::new(255, 0, 0));
        let b = many_stops(Rgb::new(0, 0, 255));
        let params = MemoryParams {
            feedback: 0.0,
            ..MemoryParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        for stop in out.stops() {
            assert!(stop.color.r.abs_diff(128) <= 1);
            assert!(stop.color.b.abs_diff(128) <= 1);
        }
    }

    #[test]
    fn memory_trails_a_color_change() {
        // Red half then blue half: with feedback the first blue stops keep
        // some red pulled in from memory.
        let a = g(&[
            (0.0, Rgb::new(255, 0, 0)),
            (0.1, Rgb::new(255, 0, 0)),
            (0.2, Rgb::new(255, 0, 0)),
            (0.3, Rgb::new(255, 0, 0)),
            (0.4, Rgb::new(255, 0, 0)),
            (0.6, Rgb::new(0, 0, 255)),
            (0.7, Rgb::new(0, 0, 255)),
            (0.8, Rgb::new(0, 0, 255)),
            (0.9, Rgb::new(0, 0, 255)),
            (1.0, Rgb::new(0, 0, 255)),
        ]);
        let b = a.clone();
        let params = MemoryParams {
            feedback: 0.6,
            ..MemoryParams::default()
        };
        let out = blend(&params, &[(&a, 1.0), (&b, 1.0)]);
        let at_06 = out
            .stops()
            .iter()
            .find(|s| (s.position - 0.6).abs() < 1e-6)
            .copied()
            .unwrap();
        assert!(at_06.color.r > 30, "no red trail at 0.6: {}", at_06.color);
    }

    #[test]
    fn deterministic() {
        let a = many_stops(Rgb::new(200, 40, 10));
        let b = many_stops(Rgb::new(10, 40, 200));
        let params = MemoryParams::default();
        assert_eq!(
            blend(&params, &[(&a, 1.0), (&b, 2.0)]),
            blend(&params, &[(&a, 1.0), (&b, 2.0)])
        );
    }

    #[test]
    fn single_input_is_clone() {
        let a = many_stops(Rgb::new(10, 20, 30));
        let out = blend(&MemoryParams::default(), &[(&a, 1.0)]);
        assert_eq!(out.stops(), a.stops());
    }
}
