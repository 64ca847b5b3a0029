//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies
//!
//! The only side effects are wallet debits and credits, made through the
//! `Wallet` handle passed into each call.

pub mod board;
pub mod collision;
pub mod drift;
pub mod error;
pub mod payout;
pub mod simulation;
pub mod state;
pub mod stuck;
pub mod tick;

pub use board::{Board, Bucket, Peg};
pub use collision::{CollisionResult, ball_peg_collision, ball_wall_collision, first_peg_collision};
pub use drift::{DriftParams, Side, drift_impulse};
pub use error::{RejectionReason, StaleBallReference};
pub use payout::{Payout, compute_payout, resolve_bucket};
pub use simulation::{BallView, Simulation, Snapshot, parse_wager, validate_wager};
pub use state::{Ball, BallId, DropOutcome, OutcomeKind, TrailPoint};
pub use tick::{StepReport, step_ball};
