//! Ball entities and drop outcome events

use std::collections::VecDeque;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle for an in-flight ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u64);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ball#{}", self.0)
    }
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// A ball in flight
#[derive(Debug, Clone, Serialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Stake debited at spawn; fixed for the ball's lifetime
    wager: f64,
    /// Simulation clock (seconds) at spawn
    pub spawn_time: f64,
    /// Ticks processed since spawn
    pub age_ticks: u32,
    /// Consecutive near-motionless ticks above the bucket band
    pub stuck_frames: u32,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: VecDeque<TrailPoint>,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, radius: f32, wager: f64, spawn_time: f64) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            wager,
            spawn_time,
            age_ticks: 0,
            stuck_frames: 0,
            trail: VecDeque::new(),
        }
    }

    #[inline]
    pub fn wager(&self) -> f64 {
        self.wager
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Simulated seconds alive at clock time `now`
    #[inline]
    pub fn age_secs(&self, now: f64) -> f64 {
        now - self.spawn_time
    }

    /// Record current position to trail, keeping at most `capacity` points
    pub fn record_trail(&mut self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        self.trail.push_front(TrailPoint {
            pos: self.pos,
            speed: self.speed(),
        });
        self.trail.truncate(capacity);
    }
}

/// How a ball left the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Reached the bucket band and was paid out
    Landed {
        bucket: usize,
        multiplier: f64,
        payout: f64,
        profit: f64,
    },
    /// Lifetime ran out; the stake is forfeited
    Expired,
}

/// Result event, emitted exactly once per terminated ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropOutcome {
    pub ball: BallId,
    pub wager: f64,
    pub age_ticks: u32,
    pub kind: OutcomeKind,
}

impl DropOutcome {
    pub fn is_landed(&self) -> bool {
        matches!(self.kind, OutcomeKind::Landed { .. })
    }

    /// Amount credited back to the wallet
    pub fn payout(&self) -> f64 {
        match self.kind {
            OutcomeKind::Landed { payout, .. } => payout,
            OutcomeKind::Expired => 0.0,
        }
    }

    /// Net result for the player
    pub fn profit(&self) -> f64 {
        match self.kind {
            OutcomeKind::Landed { profit, .. } => profit,
            OutcomeKind::Expired => -self.wager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_is_bounded_fifo() {
        let mut ball = Ball::new(BallId(1), Vec2::ZERO, 8.0, 10.0, 0.0);
        for i in 0..30 {
            ball.pos = Vec2::new(i as f32, 0.0);
            ball.record_trail(20);
        }
        assert_eq!(ball.trail.len(), 20);
        assert_eq!(ball.trail.front().unwrap().pos.x, 29.0);
        assert_eq!(ball.trail.back().unwrap().pos.x, 10.0);
    }

    #[test]
    fn test_zero_capacity_trail() {
        let mut ball = Ball::new(BallId(1), Vec2::ZERO, 8.0, 10.0, 0.0);
        ball.record_trail(0);
        assert!(ball.trail.is_empty());
    }

    #[test]
    fn test_outcome_accounting() {
        let expired = DropOutcome {
            ball: BallId(3),
            wager: 25.0,
            age_ticks: 1200,
            kind: OutcomeKind::Expired,
        };
        assert!(!expired.is_landed());
        assert_eq!(expired.payout(), 0.0);
        assert_eq!(expired.profit(), -25.0);

        let landed = DropOutcome {
            kind: OutcomeKind::Landed {
                bucket: 0,
                multiplier: 3.6,
                payout: 90.0,
                profit: 65.0,
            },
            ..expired
        };
        assert!(landed.is_landed());
        assert_eq!(landed.payout(), 90.0);
        assert_eq!(landed.profit(), 65.0);
    }

    #[test]
    fn test_ball_id_display() {
        assert_eq!(BallId(42).to_string(), "ball#42");
    }
}
