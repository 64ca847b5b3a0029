//! Fixed timestep physics step for a single ball
//!
//! Order per tick: gravity and semi-implicit Euler, at most one peg
//! collision (with drift and resting nudge), side walls, anti-stuck.
//! Constants are per tick; the step does not scale with wall-clock time.

use glam::Vec2;
use rand::Rng;

use super::board::Board;
use super::collision::{ball_wall_collision, first_peg_collision, resolve_peg_contact};
use super::drift::{DriftParams, drift_impulse};
use super::state::Ball;
use super::stuck::update_stuck;
use crate::settings::Settings;

/// What happened to a ball during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Index of the peg that was hit, if any
    pub peg_hit: Option<usize>,
    pub wall_hit: bool,
    /// Anti-stuck impulse applied
    pub jiggled: bool,
    /// Non-finite state was repaired
    pub recovered: bool,
}

/// Drift parameters for a board under the given settings
pub fn drift_params(board: &Board, settings: &Settings) -> DriftParams {
    DriftParams {
        center: board.center_x(),
        threshold: settings.neutral_zone_width(),
        factor: settings.horizontal_drift_factor,
        bias_strength: settings.drift_bias.then_some(settings.bias_strength),
    }
}

/// Advance one ball by one tick
pub fn step_ball<R: Rng + ?Sized>(
    ball: &mut Ball,
    board: &Board,
    settings: &Settings,
    rng: &mut R,
) -> StepReport {
    let mut report = StepReport::default();
    let last_pos = ball.pos;

    // Integration
    ball.vel.y += settings.gravity;
    ball.pos += ball.vel;

    // Peg collision - first hit only
    if let Some((index, hit)) = first_peg_collision(ball.pos, ball.radius, &board.pegs) {
        resolve_peg_contact(ball, &hit, settings.bounce_factor);

        let params = drift_params(board, settings);
        ball.vel.x += drift_impulse(ball.pos.x, hit.normal.x, &params, rng);

        // Don't let the ball balance on top of a peg
        let above_buckets = ball.pos.y + ball.radius < board.bucket_top;
        if ball.vel.y.abs() < settings.resting_vy_threshold && above_buckets {
            ball.vel.y += settings.resting_nudge;
            let spread = settings.resting_nudge_spread;
            if spread > 0.0 {
                ball.vel.x += rng.random_range(-spread..spread);
            }
        }

        report.peg_hit = Some(index);
    }

    report.wall_hit = ball_wall_collision(ball, board.width, settings.bounce_factor);
    report.jiggled = update_stuck(ball, board.bucket_top, settings, rng);

    if !(ball.pos.is_finite() && ball.vel.is_finite()) {
        log::warn!(
            "{} went non-finite (pos {:?}, vel {:?}), restoring {:?}",
            ball.id,
            ball.pos,
            ball.vel,
            last_pos
        );
        ball.pos = last_pos;
        ball.vel = Vec2::ZERO;
        ball_wall_collision(ball, board.width, settings.bounce_factor);
        report.recovered = true;
    }

    ball.record_trail(settings.trail_length);
    report
}
