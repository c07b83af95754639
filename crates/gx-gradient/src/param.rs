//! Bounded parameter descriptors for blend strategies.
//!
//! Every blend strategy keeps its knobs in a plain typed struct, but hosts
//! (CLI flags, recipe files, eventually sliders) need a uniform way to
//! enumerate and set them. A [`ParamSpec`] is that reflection surface: one
//! static descriptor per knob with range, default, step, and a description.
//! Setting a value by key always clamps to the spec's range — out-of-range
//! input is corrected, never rejected.

/// Static descriptor for one adjustable blend parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Stable identifier used by hosts (`"use_weights"`, `"overlap"`, …).
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Initial value.
    pub default: f32,
    /// Step size for incremental adjustment.
    pub step: f32,
    /// One-line description for tooltips and `--help` text.
    pub description: &'static str,
}

impl ParamSpec {
    /// Clamp a raw value into this spec's range. NaN falls back to the
    /// default.
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Interpret a float as the boolean convention used throughout the
    /// parameter surface (>= 0.5 is true).
    #[must_use]
    pub fn as_bool(value: f32) -> bool {
        value >= 0.5
    }
}

/// Find a spec by key in a strategy's spec table.
#[must_use]
pub fn find_spec(specs: &'static [ParamSpec], key: &str) -> Option<&'static ParamSpec> {
    specs.iter().find(|s| s.key == key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: ParamSpec = ParamSpec {
        key: "overlap",
        label: "Overlap Amount",
        min: 0.0,
        max: 1.0,
        default: 0.3,
        step: 0.05,
        description: "How much adjacent segments overlap",
    };

    #[test]
    fn clamp_inside_range_is_identity() {
        assert!((SPEC.clamp(0.4) - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn clamp_out_of_range() {
        assert!((SPEC.clamp(-1.0) - 0.0).abs() < f32::EPSILON);
        assert!((SPEC.clamp(9.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn clamp_nan_uses_default() {
        assert!((SPEC.clamp(f32::NAN) - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn bool_convention() {
        assert!(ParamSpec::as_bool(1.0));
        assert!(ParamSpec::as_bool(0.5));
        assert!(!ParamSpec::as_bool(0.49));
    }

    #[test]
    fn find_spec_by_key() {
        static SPECS: &[ParamSpec] = &[SPEC];
        assert!(find_spec(SPECS, "overlap").is_some());
        assert!(find_spec(SPECS, "nope").is_none());
    }
}
