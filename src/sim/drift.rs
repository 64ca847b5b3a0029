//! House-edge drift bias
//!
//! Every peg hit adds a horizontal impulse `n_x * drift_factor * M`, where
//! `M` is drawn from `[0.8, 1.2)`. Outside a neutral zone around the board
//! center, `M` is skewed so pushes toward the center are a little stronger
//! and pushes away from it a little weaker. No single bounce is decided by
//! the skew; it only shifts the long-run landing distribution toward the
//! low-paying center buckets.

use rand::Rng;

use crate::consts::{DRIFT_MAX, DRIFT_MIN};

/// Horizontal position relative to the neutral zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Neutral,
    Right,
}

impl Side {
    /// Classify `x` against the zone `[center - threshold, center + threshold]`
    pub fn of(x: f32, center: f32, threshold: f32) -> Self {
        if x < center - threshold {
            Side::Left
        } else if x > center + threshold {
            Side::Right
        } else {
            Side::Neutral
        }
    }
}

/// Drift tuning for one board
#[derive(Debug, Clone, Copy)]
pub struct DriftParams {
    pub center: f32,
    pub threshold: f32,
    pub factor: f32,
    /// `None` disables the center skew (plain symmetric drift)
    pub bias_strength: Option<f32>,
}

/// Skew a base multiplier toward or away from the center
///
/// `normal_x > 0` pushes the ball right. On the left side that is toward
/// the center, so `M` grows; on the right side it shrinks. A zero normal
/// component leaves `M` alone.
pub fn skew_multiplier(base: f32, side: Side, normal_x: f32, strength: f32) -> f32 {
    let toward_center = match side {
        Side::Neutral => return base,
        Side::Left => normal_x > 0.0,
        Side::Right => normal_x < 0.0,
    };
    if normal_x == 0.0 {
        base
    } else if toward_center {
        (base + strength).min(DRIFT_MAX)
    } else {
        (base - strength).max(DRIFT_MIN)
    }
}

/// Draw the drift multiplier `M` for one collision
pub fn drift_multiplier<R: Rng + ?Sized>(
    ball_x: f32,
    normal_x: f32,
    params: &DriftParams,
    rng: &mut R,
) -> f32 {
    let base = rng.random_range(DRIFT_MIN..DRIFT_MAX);
    match params.bias_strength {
        Some(strength) => {
            let side = Side::of(ball_x, params.center, params.threshold);
            skew_multiplier(base, side, normal_x, strength)
        }
        None => base,
    }
}

/// Horizontal velocity change for one peg collision
pub fn drift_impulse<R: Rng + ?Sized>(
    ball_x: f32,
    normal_x: f32,
    params: &DriftParams,
    rng: &mut R,
) -> f32 {
    normal_x * params.factor * drift_multiplier(ball_x, normal_x, params, rng)
}
