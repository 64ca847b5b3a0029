//! Rejections surfaced at the simulation boundary

use thiserror::Error;

use super::state::BallId;

/// Why a drop was refused. Nothing is debited when a drop is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("wager must be a positive, finite amount")]
    InvalidAmount,
    #[error("wager exceeds the available balance")]
    InsufficientBalance,
    #[error("board dimensions are not valid yet")]
    BoardNotReady,
}

/// Reference to a ball that has already landed or expired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is no longer in play")]
pub struct StaleBallReference(pub BallId);
