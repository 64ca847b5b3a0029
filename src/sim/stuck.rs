//! Anti-stuck recovery
//!
//! A ball wedged among pegs can come to rest. After enough consecutive
//! near-motionless ticks it gets a small random kick.

use rand::Rng;

use super::state::Ball;
use crate::settings::Settings;

/// Update the stuck counter and jiggle the ball if it has stalled
///
/// Returns true if an impulse was applied this tick.
pub fn update_stuck<R: Rng + ?Sized>(
    ball: &mut Ball,
    bucket_top: f32,
    settings: &Settings,
    rng: &mut R,
) -> bool {
    let above_buckets = ball.pos.y + ball.radius < bucket_top;
    if !above_buckets || ball.speed() >= settings.min_velocity_threshold {
        ball.stuck_frames = 0;
        return false;
    }

    ball.stuck_frames += 1;
    if ball.stuck_frames <= settings.stuck_frames_threshold {
        return false;
    }

    let (spread_x, max_y) = (settings.jiggle_spread_x, settings.jiggle_max_y);
    if spread_x > 0.0 {
        ball.vel.x += rng.random_range(-spread_x..spread_x);
    }
    if max_y > 0.0 {
        ball.vel.y += rng.random_range(0.0..max_y);
    }
    ball.stuck_frames = 0;
    log::trace!("{} stuck at {:?}, jiggled to {:?}", ball.id, ball.pos, ball.vel);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{JIGGLE_MAX_Y, JIGGLE_SPREAD_X};
    use crate::sim::state::BallId;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn resting_ball() -> Ball {
        Ball::new(BallId(1), Vec2::new(200.0, 150.0), 8.0, 10.0, 0.0)
    }

    #[test]
    fn test_jiggle_after_threshold() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = resting_ball();

        let mut jiggles = 0;
        for tick in 1..=61 {
            ball.vel = Vec2::ZERO;
            if update_stuck(&mut ball, 464.0, &settings, &mut rng) {
                jiggles += 1;
                assert_eq!(tick, 61);
            }
        }

        assert_eq!(jiggles, 1);
        assert_eq!(ball.stuck_frames, 0);
        assert!(ball.vel.x.abs() < JIGGLE_SPREAD_X);
        assert!((0.0..JIGGLE_MAX_Y).contains(&ball.vel.y));
    }

    #[test]
    fn test_jiggle_follows_settings() {
        let settings = Settings {
            jiggle_spread_x: 0.0,
            jiggle_max_y: 0.5,
            ..Settings::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ball = resting_ball();

        let mut jiggled = false;
        for _ in 0..61 {
            ball.vel = Vec2::ZERO;
            jiggled = update_stuck(&mut ball, 464.0, &settings, &mut rng);
        }
        assert!(jiggled);
        assert_eq!(ball.vel.x, 0.0);
        assert!((0.0..0.5).contains(&ball.vel.y));
    }

    #[test]
    fn test_counter_holds_before_threshold() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ball = resting_ball();

        for _ in 0..60 {
            assert!(!update_stuck(&mut ball, 464.0, &settings, &mut rng));
        }
        assert_eq!(ball.stuck_frames, 60);
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_motion_resets_counter() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ball = resting_ball();

        for _ in 0..30 {
            update_stuck(&mut ball, 464.0, &settings, &mut rng);
        }
        assert_eq!(ball.stuck_frames, 30);

        ball.vel = Vec2::new(0.0, 1.0);
        update_stuck(&mut ball, 464.0, &settings, &mut rng);
        assert_eq!(ball.stuck_frames, 0);
    }

    #[test]
    fn test_bucket_band_is_not_stuck() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ball = resting_ball();
        ball.pos.y = 460.0;

        for _ in 0..100 {
            assert!(!update_stuck(&mut ball, 464.0, &settings, &mut rng));
        }
        assert_eq!(ball.stuck_frames, 0);
    }
}
