//! # gx-gradient — Gradient Blending and Distribution Engine
//!
//! Pure, synchronous gradient authoring math: ten blending strategies that
//! merge weighted input gradients into one, and a distribution engine that
//! reorders stop colors over fixed positions with a smoothly adjustable
//! strength. No I/O, no global state; every stochastic ingredient takes an
//! explicit seed so identical inputs always produce identical output.
//!
//! # Architecture
//!
//! ```text
//! gradient.rs:   Gradient + ColorStop (positions in [0,1], 8-bit RGB)
//!     │
//!     ▼
//! blend/:        Blender enum — one module per strategy
//!                (interleave, mix, crossfade, stack, waveform, crystal,
//!                 layer, chromatic, memory, procedural)
//!     │
//!     ▼
//! distribute.rs: OrderingKey sort + traveling-wave strength blend
//!     │
//!     ▼
//! preset.rs:     built-in starting gradients
//! ```
//!
//! Supporting modules: `param.rs` (uniform parameter descriptors for hosts),
//! `rng.rs` (seeded xorshift PRNG and hash noise).

// Blend math uses small integer-to-float casts (indices, channel values).
#![allow(clippy::cast_precision_loss)]
// Strategy functions are inherently long — one block per parameter effect.
#![allow(clippy::too_many_lines)]
// f64→f32 truncation is intentional (PRNG values don't need f64 precision).
#![allow(clippy::cast_possible_truncation)]

pub mod blend;
pub mod distribute;
pub mod gradient;
pub mod param;
pub mod preset;
pub mod rng;

pub use blend::{BlendKind, Blender};
pub use distribute::{OrderingKey, distribute, distribute_with_strength, strength_blend};
pub use gradient::{ColorStop, Gradient, POSITION_EPSILON};
pub use param::ParamSpec;
pub use preset::{preset, preset_names};
