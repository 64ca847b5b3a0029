//! Collision detection and response
//!
//! Ball vs. peg is circle-circle; ball vs. side wall is a clamp. Balls never
//! collide with each other.

use glam::Vec2;

use super::board::Peg;
use super::state::Ball;

/// Below this center distance the contact normal is undefined
const DEGENERATE_DISTANCE: f32 = 1e-6;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal from the peg center toward the ball center
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and a single peg
///
/// A ball sitting exactly on the peg center is pushed straight up.
pub fn ball_peg_collision(ball_pos: Vec2, ball_radius: f32, peg: &Peg) -> CollisionResult {
    let offset = ball_pos - peg.pos;
    let min_dist = ball_radius + peg.radius;
    let dist_sq = offset.length_squared();

    if dist_sq >= min_dist * min_dist {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > DEGENERATE_DISTANCE {
        offset / dist
    } else {
        Vec2::NEG_Y
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: min_dist - dist,
    }
}

/// Find the first overlapping peg in layout order
///
/// Only one peg collision is resolved per ball per tick. Scanning stops at
/// the first hit, so simultaneous contacts are resolved by peg order alone.
pub fn first_peg_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    pegs: &[Peg],
) -> Option<(usize, CollisionResult)> {
    pegs.iter().enumerate().find_map(|(i, peg)| {
        let result = ball_peg_collision(ball_pos, ball_radius, peg);
        result.hit.then_some((i, result))
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Push the ball out of a peg and bounce it
///
/// Afterwards the ball touches the peg without overlapping it and its
/// reflected velocity is damped by `bounce_factor`.
pub fn resolve_peg_contact(ball: &mut Ball, hit: &CollisionResult, bounce_factor: f32) {
    ball.pos += hit.normal * hit.penetration;
    ball.vel = reflect_velocity(ball.vel, hit.normal) * bounce_factor;
}

/// Keep the ball between the side walls
///
/// Returns true if the ball hit a wall this tick.
pub fn ball_wall_collision(ball: &mut Ball, board_width: f32, bounce_factor: f32) -> bool {
    let min_x = ball.radius;
    let max_x = (board_width - ball.radius).max(min_x);

    if ball.pos.x < min_x {
        ball.pos.x = min_x;
    } else if ball.pos.x > max_x {
        ball.pos.x = max_x;
    } else {
        return false;
    }

    ball.vel.x = -ball.vel.x * bounce_factor;
    true
}
