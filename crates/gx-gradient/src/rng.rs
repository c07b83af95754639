//! Minimal deterministic PRNG for the stochastic blend ingredients.
//!
//! Everything random in the engine (procedural noise, the noise layer mask,
//! the random distribution shuffle) takes an explicit seed and builds one of
//! these locally — there is no process-global random state, so identical
//! inputs always produce identical gradients. That reproducibility is a
//! correctness requirement, not a convenience: tests depend on it.

/// Xorshift32 — small, fast, deterministic. No external `rand` crate needed.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Create a generator from a seed. A zero seed is bumped to 1 (xorshift
    /// has a fixed point at zero).
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next raw 32-bit value.
    pub const fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Uniform f32 in [0, 1).
    #[allow(clippy::cast_possible_truncation)]
    pub fn unit_f32(&mut self) -> f32 {
        (f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)) as f32
    }

    /// Uniform f32 in [lo, hi).
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        (hi - lo).mul_add(self.unit_f32(), lo)
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = (self.next_u32() as usize) % (i + 1);
            slice.swap(i, j);
        }
    }
}

/// Stateless hash noise: a reproducible pseudo-random unit value for an
/// integer lattice coordinate and seed. Used where noise must be a pure
/// function of position (layer masks, value noise) rather than of call
/// order.
#[must_use]
pub fn hash_noise(cell: i64, seed: u32) -> f32 {
    #[allow(clippy::cast_sign_loss)]
    let mut rng = Xorshift32::new((cell as u32) ^ seed.rotate_left(16) ^ 0x9e37_79b9);
    // Burn a few steps so neighboring cells decorrelate.
    rng.next_u32();
    rng.next_u32();
    rng.unit_f32()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
