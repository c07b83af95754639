//! Gradient blending strategies.
//!
//! Each strategy merges a weighted list of input gradients into one new
//! gradient. The strategy set is a closed enum — [`Blender`] — where every
//! variant carries its own typed parameter struct, and a single [`Blender::blend`]
//! dispatch replaces the string-keyed registry a dynamic host would use.
//! [`BlendKind`] provides the enumerable name surface for hosts.
//!
//! Shared contract (every strategy):
//!
//! - empty input → empty gradient named for the strategy
//! - single input → clone, except the strategies with a meaningful
//!   single-gradient effect (waveform, crystal, chromatic, procedural)
//! - inputs are never mutated; the result is always sorted by position
//! - no panics for any input shape — zero weight sums, zero segment sizes
//!   and out-of-range parameters all have documented fallbacks

pub mod chromatic;
pub mod crossfade;
pub mod crystal;
pub mod interleave;
pub mod layer;
pub mod memory;
pub mod mix;
pub mod procedural;
pub mod stack;
pub mod waveform;

pub use chromatic::ChromaticParams;
pub use crossfade::CrossfadeParams;
pub use crystal::CrystalParams;
pub use interleave::InterleaveParams;
pub use layer::LayerParams;
pub use memory::MemoryParams;
pub use mix::MixParams;
pub use procedural::ProceduralParams;
pub use stack::StackParams;
pub use waveform::WaveformParams;

use gx_color::Rgb;

use crate::gradient::{ColorStop, Gradient, POSITION_EPSILON};
use crate::param::ParamSpec;

/// A gradient with its relative contribution weight.
pub type WeightedGradient<'a> = (&'a Gradient, f32);

// ─── BlendKind ───────────────────────────────────────────────────────────────

/// The kind of blending strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendKind {
    /// Keep every stop from every input at its original position.
    Interleave,
    /// Weighted color average at each position, in RGB or HSV space.
    Mix,
    /// Sequential transition with overlapping seams, like an audio crossfade.
    Crossfade,
    /// Remap each input into its own weight-proportional segment.
    Stack,
    /// Wave interference between the inputs.
    Waveform,
    /// Faceted refraction through a simulated crystal.
    Crystal,
    /// Photoshop-style layer compositing with masks.
    Layer,
    /// Chromatic aberration: per-channel position offsets.
    Chromatic,
    /// Echo/trailing effects from a decaying memory of earlier colors.
    Memory,
    /// A procedural pattern drives the mix between two inputs.
    Procedural,
}

impl BlendKind {
    /// Machine name of this strategy (stable, lowercase).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Interleave => "interleave",
            Self::Mix => "mix",
            Self::Crossfade => "crossfade",
            Self::Stack => "stack",
            Self::Waveform => "waveform",
            Self::Crystal => "crystal",
            Self::Layer => "layer",
            Self::Chromatic => "chromatic",
            Self::Memory => "memory",
            Self::Procedural => "procedural",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Interleave => "Interleave",
            Self::Mix => "Mix",
            Self::Crossfade => "Crossfade",
            Self::Stack => "Stack",
            Self::Waveform => "Waveform",
            Self::Crystal => "Crystal",
            Self::Layer => "Layer",
            Self::Chromatic => "Chromatic",
            Self::Memory => "Memory",
            Self::Procedural => "Procedural",
        }
    }

    /// One-line description for host UIs.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Interleave => {
                "Preserves all color stops from all gradients at their original positions"
            }
            Self::Mix => "Mixes colors at each position, weighted, in RGB or HSV space",
            Self::Crossfade => {
                "Sequential transition between gradients with smooth overlapping seams"
            }
            Self::Stack => "Compresses each gradient into its own segment of the range",
            Self::Waveform => "Wave interference patterns between gradients",
            Self::Crystal => "Crystalline facet patterns with refraction and reflection",
            Self::Layer => "Photoshop-style blend modes with optional layer masks",
            Self::Chromatic => "Chromatic aberration via per-channel position offsets",
            Self::Memory => "Echo and trailing effects from earlier positions",
            Self::Procedural => "A seeded pattern function drives the blend",
        }
    }

    /// Parse a strategy from its machine name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::all().iter().find(|k| k.name() == lower).copied()
    }

    /// All strategies, in presentation order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Interleave,
            Self::Mix,
            Self::Crossfade,
            Self::Stack,
            Self::Waveform,
            Self::Crystal,
            Self::Layer,
            Self::Chromatic,
            Self::Memory,
            Self::Procedural,
        ]
    }
}

// ─── Blender ─────────────────────────────────────────────────────────────────

/// A configured blending strategy: kind plus its parameter values.
#[derive(Debug, Clone, PartialEq)]
pub enum Blender {
    Interleave(InterleaveParams),
    Mix(MixParams),
    Crossfade(CrossfadeParams),
    Stack(StackParams),
    Waveform(WaveformParams),
    Crystal(CrystalParams),
    Layer(LayerParams),
    Chromatic(ChromaticParams),
    Memory(MemoryParams),
    Procedural(ProceduralParams),
}

impl Blender {
    /// Create a blender of the given kind with default parameters.
    #[must_use]
    pub fn new(kind: BlendKind) -> Self {
        match kind {
            BlendKind::Interleave => Self::Interleave(InterleaveParams::default()),
            BlendKind::Mix => Self::Mix(MixParams::default()),
            BlendKind::Crossfade => Self::Crossfade(CrossfadeParams::default()),
            BlendKind::Stack => Self::Stack(StackParams::default()),
            BlendKind::Waveform => Self::Waveform(WaveformParams::default()),
            BlendKind::Crystal => Self::Crystal(CrystalParams::default()),
            BlendKind::Layer => Self::Layer(LayerParams::default()),
            BlendKind::Chromatic => Self::Chromatic(ChromaticParams::default()),
            BlendKind::Memory => Self::Memory(MemoryParams::default()),
            BlendKind::Procedural => Self::Procedural(ProceduralParams::default()),
        }
    }

    /// Which strategy this is.
    #[must_use]
    pub const fn kind(&self) -> BlendKind {
        match self {
            Self::Interleave(_) => BlendKind::Interleave,
            Self::Mix(_) => BlendKind::Mix,
            Self::Crossfade(_) => BlendKind::Crossfade,
            Self::Stack(_) => BlendKind::Stack,
            Self::Waveform(_) => BlendKind::Waveform,
            Self::Crystal(_) => BlendKind::Crystal,
            Self::Layer(_) => BlendKind::Layer,
            Self::Chromatic(_) => BlendKind::Chromatic,
            Self::Memory(_) => BlendKind::Memory,
            Self::Procedural(_) => BlendKind::Procedural,
        }
    }

    /// The parameter descriptors for this strategy.
    #[must_use]
    pub const fn specs(&self) -> &'static [ParamSpec] {
        match self {
            Self::Interleave(_) => InterleaveParams::SPECS,
            Self::Mix(_) => MixParams::SPECS,
            Self::Crossfade(_) => CrossfadeParams::SPECS,
            Self::Stack(_) => StackParams::SPECS,
            Self::Waveform(_) => WaveformParams::SPECS,
            Self::Crystal(_) => CrystalParams::SPECS,
            Self::Layer(_) => LayerParams::SPECS,
            Self::Chromatic(_) => ChromaticParams::SPECS,
            Self::Memory(_) => MemoryParams::SPECS,
            Self::Procedural(_) => ProceduralParams::SPECS,
        }
    }

    /// Set a parameter by key. The value is clamped to the spec range.
    /// Returns false when the key does not belong to this strategy.
    pub fn set(&mut self, key: &str, value: f32) -> bool {
        match self {
            Self::Interleave(p) => p.set(key, value),
            Self::Mix(p) => p.set(key, value),
            Self::Crossfade(p) => p.set(key, value),
            Self::Stack(p) => p.set(key, value),
            Self::Waveform(p) => p.set(key, value),
            Self::Crystal(p) => p.set(key, value),
            Self::Layer(p) => p.set(key, value),
            Self::Chromatic(p) => p.set(key, value),
            Self::Memory(p) => p.set(key, value),
            Self::Procedural(p) => p.set(key, value),
        }
    }

    /// Run the blend.
    #[must_use]
    pub fn blend(&self, inputs: &[WeightedGradient]) -> Gradient {
        match self {
            Self::Interleave(p) => interleave::blend(p, inputs),
            Self::Mix(p) => mix::blend(p, inputs),
            Self::Crossfade(p) => crossfade::blend(p, inputs),
            Self::Stack(p) => stack::blend(p, inputs),
            Self::Waveform(p) => waveform::blend(p, inputs),
            Self::Crystal(p) => crystal::blend(p, inputs),
            Self::Layer(p) => layer::blend(p, inputs),
            Self::Chromatic(p) => chromatic::blend(p, inputs),
            Self::Memory(p) => memory::blend(p, inputs),
            Self::Procedural(p) => procedural::blend(p, inputs),
        }
    }
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// The name every merged gradient carries, tagged with its strategy.
pub(crate) fn result_name(kind: BlendKind) -> String {
    format!("Merged Gradient ({})", kind.label())
}

/// An empty result gradient for degenerate input.
pub(crate) fn empty_result(kind: BlendKind) -> Gradient {
    Gradient::new(result_name(kind))
}

/// Clone a single input as the result, renamed for the strategy.
pub(crate) fn clone_result(kind: BlendKind, gradient: &Gradient) -> Gradient {
    let mut g = gradient.clone();
    g.set_name(result_name(kind));
    g
}

/// Drop zero-weight inputs when the strategy is weight-sensitive.
pub(crate) fn effective_inputs<'a>(
    inputs: &[WeightedGradient<'a>],
    use_weights: bool,
) -> Vec<WeightedGradient<'a>> {
    if use_weights {
        inputs.iter().copied().filter(|&(_, w)| w > 0.0).collect()
    } else {
        inputs.to_vec()
    }
}

/// Every stop position from every input, sorted ascending, positions closer
/// than [`POSITION_EPSILON`] collapsed to one.
///
/// Blends sample at these positions instead of resampling uniformly, so the
/// structure of the source gradients survives the merge.
pub(crate) fn union_positions(inputs: &[WeightedGradient]) -> Vec<f32> {
    let mut positions: Vec<f32> = inputs
        .iter()
        .flat_map(|(g, _)| g.stops().iter().map(|s| s.position))
        .collect();
    positions.sort_by(f32::total_cmp);
    positions.dedup_by(|a, b| (*a - *b).abs() < POSITION_EPSILON);
    positions
}

/// Weighted arithmetic mean of RGB colors. `None` when the weights sum to
/// zero (callers pick their own fallback).
pub(crate) fn weighted_mean<I>(colors: I) -> Option<Rgb>
where
    I: IntoIterator<Item = (Rgb, f32)>,
{
    let mut r = 0.0f32;
    let mut g = 0.0f32;
    let mut b = 0.0f32;
    let mut total = 0.0f32;
    for (color, weight) in colors {
        let w = weight.max(0.0);
        r = f32::from(color.r).mul_add(w, r);
        g = f32::from(color.g).mul_add(w, g);
        b = f32::from(color.b).mul_add(w, b);
        total += w;
    }
    if total > 0.0 {
        Some(Rgb::from_f32(r / total, g / total, b / total))
    } else {
        None
    }
}

/// Weight-proportional segment sizes over [0, 1].
///
/// Equal division when weights are disabled or all zero — each strategy that
/// partitions the range (crossfade, stack) shares this normalization.
pub(crate) fn segment_sizes(inputs: &[WeightedGradient], use_weights: bool) -> Vec<f32> {
    let n = inputs.len().max(1);
    #[allow(clippy::cast_precision_loss)]
    let equal = 1.0 / n as f32;
    if !use_weights {
        return vec![equal; inputs.len()];
    }
    let total: f32 = inputs.iter().map(|&(_, w)| w.max(0.0)).sum();
    if total > 0.0 {
        inputs.iter().map(|&(_, w)| w.max(0.0) / total).collect()
    } else {
        vec![equal; inputs.len()]
    }
}

/// Cumulative boundaries for a list of segment sizes: `[0, s0, s0+s1, …]`.
pub(crate) fn segment_boundaries(sizes: &[f32]) -> Vec<f32> {
    let mut boundaries = Vec::with_capacity(sizes.len() + 1);
    boundaries.push(0.0);
    let mut acc = 0.0f32;
    for &size in sizes {
        acc += size;
        boundaries.push(acc);
    }
    boundaries
}

/// Build the sorted result gradient from raw (position, color) pairs.
pub(crate) fn finish(kind: BlendKind, stops: Vec<(f32, Rgb)>) -> Gradient {
    let mut g = Gradient::from_stops(
        result_name(kind),
        stops
            .into_iter()
            .map(|(pos, color)| ColorStop::new(pos, color))
            .collect(),
    );
    g.sort_stops();
    g
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn g(stops: &[(f32, Rgb)]) -> Gradient {
        Gradient::from_stops(
            "g",
            stops
                .iter()
                .map(|&(p, c)| ColorStop::new(p, c))
                .collect(),
        )
    }

    #[test]
    fn kind_name_round_trip() {
        for &kind in BlendKind::all() {
            assert_eq!(BlendKind::from_name(kind.name()), Some(kind));
            assert_eq!(BlendKind::from_name(&kind.name().to_uppercase()), Some(kind));
        }
        assert_eq!(BlendKind::from_name("nope"), None);
    }

    #[test]
    fn every_kind_has_specs() {
        for &kind in BlendKind::all() {
            let blender = Blender::new(kind);
            assert!(!blender.specs().is_empty(), "{kind:?} has no parameters");
        }
    }

    #[test]
    fn spec_keys_unique_per_strategy() {
        for &kind in BlendKind::all() {
            let blender = Blender::new(kind);
            let specs = blender.specs();
            for (i, a) in specs.iter().enumerate() {
                for b in &specs[i + 1..] {
                    assert_ne!(a.key, b.key, "{kind:?} duplicates key {}", a.key);
                }
            }
        }
    }

    #[test]
    fn set_unknown_key_is_rejected() {
        let mut blender = Blender::new(BlendKind::Mix);
        assert!(!blender.set("no_such_knob", 1.0));
        assert!(blender.set("use_weights", 0.0));
    }

    #[test]
    fn empty_input_never_panics() {
        for &kind in BlendKind::all() {
            let result = Blender::new(kind).blend(&[]);
            assert!(result.is_empty(), "{kind:?} produced stops from nothing");
            assert!(result.name().contains(kind.label()));
        }
    }

    #[test]
    fn all_outputs_sorted_and_in_range() {
        let a = g(&[
            (0.0, Rgb::new(255, 0, 0)),
            (0.37, Rgb::new(0, 255, 0)),
            (1.0, Rgb::new(0, 0, 255)),
        ]);
        let b = g(&[(0.2, Rgb::new(255, 255, 0)), (0.9, Rgb::new(0, 255, 255))]);
        for &kind in BlendKind::all() {
            let result = Blender::new(kind).blend(&[(&a, 1.0), (&b, 2.0)]);
            let stops = result.stops();
            assert!(!stops.is_empty(), "{kind:?} produced nothing");
            for pair in stops.windows(2) {
                assert!(
                    pair[0].position <= pair[1].position,
                    "{kind:?} output unsorted"
                );
            }
            for s in stops {
                assert!((0.0..=1.0).contains(&s.position), "{kind:?} out of range");
            }
        }
    }

    #[test]
    fn union_positions_dedups_within_epsilon() {
        let a = g(&[(0.0, Rgb::BLACK), (0.5, Rgb::BLACK)]);
        let b = g(&[(0.5002, Rgb::WHITE), (1.0, Rgb::WHITE)]);
        let positions = union_positions(&[(&a, 1.0), (&b, 1.0)]);
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn weighted_mean_zero_total_is_none() {
        assert_eq!(weighted_mean([(Rgb::WHITE, 0.0), (Rgb::BLACK, 0.0)]), None);
    }

    #[test]
    fn weighted_mean_respects_weights() {
        let mean = weighted_mean([(Rgb::new(255, 0, 0), 3.0), (Rgb::new(0, 0, 255), 1.0)])
            .unwrap();
        assert!(mean.r > 180 && mean.b < 80);
    }

    #[test]
    fn segment_sizes_equal_when_all_zero() {
        let a = g(&[(0.0, Rgb::BLACK)]);
        let b = g(&[(1.0, Rgb::WHITE)]);
        let sizes = segment_sizes(&[(&a, 0.0), (&b, 0.0)], true);
        assert_eq!(sizes, vec![0.5, 0.5]);
    }

    #[test]
    fn segment_sizes_proportional() {
        let a = g(&[(0.0, Rgb::BLACK)]);
        let b = g(&[(1.0, Rgb::WHITE)]);
        let sizes = segment_sizes(&[(&a, 3.0), (&b, 1.0)], true);
        assert!((sizes[0] - 0.75).abs() < 1e-6);
        assert!((sizes[1] - 0.25).abs() < 1e-6);
    }
}
