// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Float canonicalization for artwork fingerprints.
//!
//! Equivalent floats (`-0.0` and `0.0`, values differing past the sixth
//! decimal) must hash identically, otherwise two runs could disagree on
//! whether a face is the same face.

/// Canonicalize a float for hashing.
///
/// Truncates to six decimals and folds `-0.0` into `0.0`. Non-finite input
/// maps to `0.0`; artwork geometry is always finite.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn canonicalize_f32(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    let scaled = f64::from(x) * 1_000_000.0;
    let truncated = (scaled as i64) as f64 / 1_000_000.0;
    if truncated == 0.0 {
        0.0
    } else {
        truncated as f32
    }
}

/// Canonicalize a 2D point.
pub fn canonicalize_point(p: [f32; 2]) -> [f32; 2] {
    [canonicalize_f32(p[0]), canonicalize_f32(p[1])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_folds() {
        assert_eq!(canonicalize_f32(-0.0).to_bits(), 0.0_f32.to_bits());
    }

    #[test]
    fn truncates_past_six_decimals() {
        assert_eq!(canonicalize_f32(1.234_567_9), canonicalize_f32(1.234_567_1));
    }

    #[test]
    fn non_finite_collapses() {
        assert_eq!(canonicalize_f32(f32::NAN), 0.0);
        assert_eq!(canonicalize_point([f32::INFINITY, 2.5]), [0.0, 2.5]);
    }
}
