//! Easing curves for the morph timer
//!
//! The four ease-in curves the transition picks from, each with a 25%
//! chance. Curves map normalized time [0,1] to a progress value; back may
//! overshoot below zero on the way in.

use rand::Rng;

use crate::constants::timing::BACK_OVERSHOOT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasingKind {
    InCubic,
    InExpo,
    InBack,
    InSine,
}

impl EasingKind {
    /// Draw a curve uniformly: [0,0.25) cubic, [0.25,0.5) expo,
    /// [0.5,0.75) back, [0.75,1) sine.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let draw: f32 = rng.gen();
        if draw < 0.25 {
            EasingKind::InCubic
        } else if draw < 0.5 {
            EasingKind::InExpo
        } else if draw < 0.75 {
            EasingKind::InBack
        } else {
            EasingKind::InSine
        }
    }

    /// Evaluate the curve at normalized time `t` in [0,1].
    pub fn evaluate(self, t: f32) -> f32 {
        match self {
            EasingKind::InCubic => t * t * t,
            EasingKind::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    (2.0f32).powf(10.0 * (t - 1.0))
                }
            }
            // Overshoot amplitude fixed at 0.6
            EasingKind::InBack => {
                let s = BACK_OVERSHOOT;
                t * t * ((s + 1.0) * t - s)
            }
            EasingKind::InSine => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn curves_hit_both_endpoints() {
        for kind in [
            EasingKind::InCubic,
            EasingKind::InExpo,
            EasingKind::InBack,
            EasingKind::InSine,
        ] {
            assert!(kind.evaluate(0.0).abs() < 1e-6, "{kind:?} at t=0");
            assert!((kind.evaluate(1.0) - 1.0).abs() < 1e-3, "{kind:?} at t=1");
        }
    }

    #[test]
    fn back_dips_negative_early() {
        // Ease-in-back undershoots at the start; that is its whole point.
        assert!(EasingKind::InBack.evaluate(0.2) < 0.0);
    }

    #[test]
    fn pick_covers_all_curves() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..256 {
            match EasingKind::pick(&mut rng) {
                EasingKind::InCubic => seen[0] = true,
                EasingKind::InExpo => seen[1] = true,
                EasingKind::InBack => seen[2] = true,
                EasingKind::InSine => seen[3] = true,
            }
        }
        assert!(seen.iter().all(|s| *s), "256 draws missed a curve: {seen:?}");
    }
}
