//! Mesh scale normalization - pure function
//!
//! Maps meshes of arbitrary physical size onto a common visual size band
//! so wildly different assets occupy comparable screen space.

use glam::Vec3;

use crate::constants::scale::{ENVELOPE_MAX, ENVELOPE_MIN};

/// Uniform scale factor placing `bounds_size.length() * factor` inside the
/// [4, 5] envelope. Degenerate (near-zero) bounds are a configuration
/// error caught by `MeshAsset::validate`, not handled here.
pub fn normalize_scale(bounds_size: Vec3) -> f32 {
    let magnitude = bounds_size.length();
    magnitude.clamp(ENVELOPE_MIN, ENVELOPE_MAX) / magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_ten_halves() {
        // |(10,0,0)| = 10, clamp to 5, factor 0.5
        let factor = normalize_scale(Vec3::new(10.0, 0.0, 0.0));
        assert!((factor - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scaled_magnitude_stays_in_envelope() {
        for magnitude in [0.01f32, 0.5, 1.0, 4.0, 4.5, 5.0, 20.0, 1000.0] {
            let size = Vec3::new(magnitude, 0.0, 0.0);
            let scaled = magnitude * normalize_scale(size);
            assert!(
                (ENVELOPE_MIN..=ENVELOPE_MAX).contains(&scaled),
                "magnitude {magnitude} scaled to {scaled}"
            );
        }
    }

    #[test]
    fn in_band_magnitude_is_untouched() {
        let factor = normalize_scale(Vec3::new(3.0, 0.0, 3.0));
        // |(3,0,3)| ~ 4.2426, already inside the band
        assert!((factor - 1.0).abs() < 1e-6);
    }
}
