//! Ball lifecycle manager
//!
//! `Simulation` owns the board, the in-flight balls, the clock and the RNG.
//! Callers drive it with `drop_ball` and a periodic `tick`; the wallet is
//! passed in per call and only ever sees one debit per accepted drop and at
//! most one credit per ball.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::board::Board;
use super::error::{RejectionReason, StaleBallReference};
use super::payout::{Payout, compute_payout, crossed_bucket_line, resolve_bucket};
use super::state::{Ball, BallId, DropOutcome, OutcomeKind, TrailPoint};
use super::tick::step_ball;
use crate::settings::{ExpiryPolicy, Settings};
use crate::wallet::Wallet;

/// Slack on the lifetime check so float clock drift can't add a tick
const LIFETIME_EPSILON: f64 = 1e-9;

/// Check a wager before anything is debited
pub fn validate_wager(wager: f64) -> Result<f64, RejectionReason> {
    if wager.is_finite() && wager > 0.0 {
        Ok(wager)
    } else {
        Err(RejectionReason::InvalidAmount)
    }
}

/// Parse a wager typed by the player
pub fn parse_wager(input: &str) -> Result<f64, RejectionReason> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| RejectionReason::InvalidAmount)
        .and_then(validate_wager)
}

/// Read-only view of one ball for rendering
#[derive(Debug, Serialize)]
pub struct BallView<'a> {
    pub id: BallId,
    pub pos: Vec2,
    pub radius: f32,
    pub trail: &'a VecDeque<TrailPoint>,
}

/// Read-only view of the whole simulation for rendering
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub tick: u64,
    pub board: &'a Board,
    pub balls: Vec<BallView<'a>>,
}

/// An independent Plinko board with its balls in flight
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    seed: u64,
    rng: Pcg32,
    board: Board,
    /// Active balls, in spawn order
    balls: Vec<Ball>,
    /// Simulated seconds
    clock: f64,
    time_ticks: u64,
    running: bool,
    next_id: u64,
}

impl Simulation {
    /// Create a simulation with no board yet; call `resize` before dropping
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            board: Board::empty(0.0, 0.0),
            balls: Vec::new(),
            clock: 0.0,
            time_ticks: 0,
            running: false,
            next_id: 1,
        }
    }

    /// Create a simulation with a board of the given size
    pub fn with_board(settings: Settings, seed: u64, width: f32, height: f32) -> Self {
        let mut sim = Self::new(settings, seed);
        sim.resize(width, height);
        sim
    }

    /// Regenerate the board for new surface dimensions
    ///
    /// Balls in flight are kept; the side walls pull them back in on their
    /// next step.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.board = Board::generate(width, height, &self.settings);
        if self.board.is_ready() {
            log::info!(
                "Board {}x{}: {} pegs, {} buckets",
                width,
                height,
                self.board.pegs.len(),
                self.board.buckets.len()
            );
        } else {
            log::info!("Board {}x{} not ready, drops disabled", width, height);
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulated seconds elapsed
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Whether the caller should keep scheduling ticks
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Look up an active ball
    pub fn ball(&self, id: BallId) -> Result<&Ball, StaleBallReference> {
        self.balls
            .iter()
            .find(|b| b.id == id)
            .ok_or(StaleBallReference(id))
    }

    /// Debit `wager` and spawn a ball near the top center
    ///
    /// Starts the tick loop if it was idle.
    pub fn drop_ball<W: Wallet + ?Sized>(
        &mut self,
        wallet: &mut W,
        wager: f64,
    ) -> Result<BallId, RejectionReason> {
        let wager = validate_wager(wager)?;
        if !self.board.is_ready() {
            return Err(RejectionReason::BoardNotReady);
        }
        if wager > wallet.balance() {
            return Err(RejectionReason::InsufficientBalance);
        }
        wallet.debit(wager).map_err(|err| {
            log::debug!("Wallet refused debit: {}", err);
            RejectionReason::InsufficientBalance
        })?;

        let id = BallId(self.next_id);
        self.next_id += 1;
        let pos = self.spawn_point();
        self.balls
            .push(Ball::new(id, pos, self.settings.ball_radius, wager, self.clock));

        if !self.running {
            log::debug!("Tick loop started");
        }
        self.running = true;
        log::debug!("{} dropped at ({:.1}, {:.1}), wager {}", id, pos.x, pos.y, wager);
        Ok(id)
    }

    /// Random point in the central band of the top edge
    fn spawn_point(&mut self) -> Vec2 {
        let jitter = self.settings.spawn_jitter;
        let offset = if jitter > 0.0 {
            self.rng.random_range(-jitter..jitter)
        } else {
            0.0
        };

        let radius = self.settings.ball_radius;
        let max_x = (self.board.width - radius).max(radius);
        let x = (self.board.center_x() + offset).clamp(radius, max_x);
        let y = (self.settings.peg_top - self.settings.row_spacing).max(radius);
        Vec2::new(x, y)
    }

    /// Advance every active ball by one tick of `dt` simulated seconds
    ///
    /// Returns one outcome per ball that landed or expired this tick. Does
    /// nothing while idle, on an unready board, or for a `dt` that would
    /// not advance the clock.
    pub fn tick<W: Wallet + ?Sized>(&mut self, wallet: &mut W, dt: f64) -> Vec<DropOutcome> {
        if !self.running || !self.board.is_ready() {
            return Vec::new();
        }
        let now = self.clock + dt;
        if !(dt.is_finite() && dt > 0.0 && now > self.clock) {
            log::warn!("Ignoring tick with dt {}", dt);
            return Vec::new();
        }

        self.clock = now;
        self.time_ticks += 1;
        let tick = self.time_ticks;

        let Self {
            ref settings,
            ref mut rng,
            ref board,
            ref mut balls,
            ref mut running,
            ..
        } = *self;

        let mut outcomes = Vec::new();
        balls.retain_mut(|ball| {
            ball.age_ticks += 1;

            let outcome = if ball.age_secs(now) >= settings.max_lifetime_secs - LIFETIME_EPSILON {
                Some(expire(ball, board, settings, wallet))
            } else {
                step_ball(ball, board, settings, rng);
                crossed_bucket_line(ball, board).then(|| settle(ball, board, wallet))
            };

            match outcome {
                Some(outcome) => {
                    outcomes.push(outcome);
                    false
                }
                None => true,
            }
        });

        if balls.is_empty() {
            *running = false;
            log::debug!("All balls settled, tick loop idle at tick {}", tick);
        }
        outcomes
    }

    /// Tick until every active ball has landed or expired
    pub fn run_until_idle<W: Wallet + ?Sized>(&mut self, wallet: &mut W, dt: f64) -> Vec<DropOutcome> {
        let mut outcomes = Vec::new();
        while self.running {
            let before = self.time_ticks;
            outcomes.extend(self.tick(wallet, dt));
            if self.time_ticks == before {
                break;
            }
        }
        outcomes
    }

    /// Read-only view for a renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tick: self.time_ticks,
            board: &self.board,
            balls: self
                .balls
                .iter()
                .map(|ball| BallView {
                    id: ball.id,
                    pos: ball.pos,
                    radius: ball.radius,
                    trail: &ball.trail,
                })
                .collect(),
        }
    }
}

/// Pay out a ball that reached the bucket band
fn settle<W: Wallet + ?Sized>(ball: &Ball, board: &Board, wallet: &mut W) -> DropOutcome {
    let Some(bucket) = resolve_bucket(board, ball.pos.x) else {
        log::warn!("{} reached a board without buckets", ball.id);
        return forfeit(ball);
    };

    let multiplier = board.buckets[bucket].multiplier;
    let Payout { payout, profit } = compute_payout(ball.wager(), multiplier);
    wallet.credit(payout);
    log::debug!(
        "{} landed in bucket {} ({}), payout {}, profit {}",
        ball.id,
        bucket,
        board.buckets[bucket].label,
        payout,
        profit
    );

    DropOutcome {
        ball: ball.id,
        wager: ball.wager(),
        age_ticks: ball.age_ticks,
        kind: OutcomeKind::Landed {
            bucket,
            multiplier,
            payout,
            profit,
        },
    }
}

fn forfeit(ball: &Ball) -> DropOutcome {
    DropOutcome {
        ball: ball.id,
        wager: ball.wager(),
        age_ticks: ball.age_ticks,
        kind: OutcomeKind::Expired,
    }
}

/// Apply the expiry policy to a ball whose lifetime ran out
fn expire<W: Wallet + ?Sized>(
    ball: &Ball,
    board: &Board,
    settings: &Settings,
    wallet: &mut W,
) -> DropOutcome {
    match settings.expiry_policy {
        ExpiryPolicy::Forfeit => {
            log::debug!(
                "{} expired after {} ticks, stake {} forfeited",
                ball.id,
                ball.age_ticks,
                ball.wager()
            );
            forfeit(ball)
        }
        ExpiryPolicy::NearestBucket => {
            log::debug!("{} expired after {} ticks, settling at x={:.1}", ball.id, ball.age_ticks, ball.pos.x);
            settle(ball, board, wallet)
        }
    }
}
