//! Easing curves mapping animation progress [0, 1] to distance covered [0, 1].

use std::f64::consts::PI;

pub use fixsteps_core::EasingType;

pub trait EasingTypeExt {
    /// Eased distance for progress `t`; `t` is clamped to [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Swing => swing(t),
            EasingType::Cubic => ease_out_pow(t, 3),
            EasingType::Quintic => ease_out_pow(t, 5),
        }
    }
}

/// Half-cosine ease-in-out: 0.5 - cos(πt) / 2
#[inline]
fn swing(t: f64) -> f64 {
    0.5 - (t * PI).cos() / 2.0
}

/// 1 - (1 - t)^n
#[inline]
fn ease_out_pow(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}
