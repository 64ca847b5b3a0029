//! Bucket resolution and payout
//!
//! A ball whose lower edge passes the bucket band's top edge is assigned
//! exactly one bucket and paid `floor(wager * multiplier)`.

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::state::Ball;

/// Amount returned for a landed ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub payout: f64,
    pub profit: f64,
}

/// Compute the payout for a stake landing on `multiplier`
#[inline]
pub fn compute_payout(wager: f64, multiplier: f64) -> Payout {
    let payout = (wager * multiplier).floor();
    Payout {
        payout,
        profit: payout - wager,
    }
}

/// Whether the ball has entered the bucket band
#[inline]
pub fn crossed_bucket_line(ball: &Ball, board: &Board) -> bool {
    ball.pos.y + ball.radius > board.bucket_top
}

/// Index of the bucket a ball at `x` lands in
///
/// Uses the bucket whose range contains `x`. A ball that overshot the outer
/// buckets gets the bucket with the nearest center instead. Returns `None`
/// only for a board without buckets.
pub fn resolve_bucket(board: &Board, x: f32) -> Option<usize> {
    if let Some(index) = board.buckets.iter().position(|b| b.contains(x)) {
        return Some(index);
    }

    board
        .buckets
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.center() - x).abs().total_cmp(&(b.center() - x).abs()))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::board::Bucket;
    use crate::sim::state::BallId;
    use glam::Vec2;

    fn board() -> Board {
        Board::generate(BOARD_WIDTH, BOARD_HEIGHT, &Settings::default())
    }

    #[test]
    fn test_payout_scenarios() {
        assert_eq!(
            compute_payout(100.0, 5.0),
            Payout {
                payout: 500.0,
                profit: 400.0
            }
        );
        assert_eq!(
            compute_payout(100.0, 0.1),
            Payout {
                payout: 10.0,
                profit: -90.0
            }
        );
    }

    #[test]
    fn test_payout_floors() {
        assert_eq!(compute_payout(15.0, 0.5).payout, 7.0);
        assert_eq!(compute_payout(3.0, 3.6).payout, 10.0);
        assert_eq!(compute_payout(1.0, 0.2).payout, 0.0);
    }

    #[test]
    fn test_payout_is_repeatable() {
        let first = compute_payout(37.0, 1.6);
        for _ in 0..1000 {
            assert_eq!(compute_payout(37.0, 1.6), first);
        }
    }

    #[test]
    fn test_resolve_by_containment() {
        let board = board();
        let width = BOARD_WIDTH / 13.0;
        assert_eq!(resolve_bucket(&board, 0.0), Some(0));
        assert_eq!(resolve_bucket(&board, width * 6.5), Some(6));
        assert_eq!(resolve_bucket(&board, BOARD_WIDTH - 1.0), Some(12));
    }

    #[test]
    fn test_overshoot_falls_back_to_nearest() {
        let board = board();
        assert_eq!(resolve_bucket(&board, -50.0), Some(0));
        assert_eq!(resolve_bucket(&board, BOARD_WIDTH), Some(12));
        assert_eq!(resolve_bucket(&board, BOARD_WIDTH + 300.0), Some(12));
        assert!(resolve_bucket(&board, f32::NAN).is_some());
    }

    #[test]
    fn test_gap_between_buckets_uses_nearest_center() {
        let mut board = Board::empty(100.0, 100.0);
        board.buckets = vec![
            Bucket {
                x_start: 0.0,
                width: 20.0,
                multiplier: 2.0,
                label: "2x".into(),
            },
            Bucket {
                x_start: 60.0,
                width: 20.0,
                multiplier: 2.0,
                label: "2x".into(),
            },
        ];
        assert_eq!(resolve_bucket(&board, 35.0), Some(0));
        assert_eq!(resolve_bucket(&board, 45.0), Some(1));
    }

    #[test]
    fn test_no_buckets() {
        assert_eq!(resolve_bucket(&Board::empty(0.0, 0.0), 10.0), None);
    }

    #[test]
    fn test_bucket_line_crossing() {
        let board = board();
        let mut ball = Ball::new(BallId(1), Vec2::new(240.0, 400.0), BALL_RADIUS, 10.0, 0.0);
        assert!(!crossed_bucket_line(&ball, &board));
        ball.pos.y = board.bucket_top - BALL_RADIUS;
        assert!(!crossed_bucket_line(&ball, &board));
        ball.pos.y += 0.5;
        assert!(crossed_bucket_line(&ball, &board));
    }
}
