//! Plinko Sim - ball-drop physics core for a Plinko-style game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board layout, physics, drift bias, payouts)
//! - `settings`: Data-driven tuning and risk profiles
//! - `wallet`: Balance collaborator contract
//! - `stats`: Session tally over drop outcomes

pub mod settings;
pub mod sim;
pub mod stats;
pub mod wallet;

pub use settings::{ExpiryPolicy, RiskProfile, Settings, SettingsError};
pub use stats::SessionStats;
pub use wallet::{MemoryWallet, Wallet, WalletError};

/// Game configuration constants
pub mod consts {
    /// Display refresh cadence the tick loop is driven at
    pub const TICK_RATE_HZ: f64 = 60.0;
    /// Simulated seconds per tick at the nominal refresh rate
    pub const SIM_DT: f64 = 1.0 / TICK_RATE_HZ;

    /// Default board dimensions (15 peg spacings wide)
    pub const BOARD_WIDTH: f32 = 480.0;
    pub const BOARD_HEIGHT: f32 = 504.0;

    /// Peg layout - row r holds r + 3 pegs
    pub const ROWS: u32 = 12;
    pub const PEG_SPACING: f32 = 32.0;
    pub const ROW_SPACING: f32 = 32.0;
    /// y of the first peg row
    pub const PEG_TOP: f32 = 80.0;
    pub const PEG_RADIUS: f32 = 5.0;

    /// Bucket band at the bottom of the board
    pub const BUCKET_HEIGHT: f32 = 40.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Half-width of the central spawn band
    pub const SPAWN_JITTER: f32 = 8.0;

    /// Per-tick gravity (pixels/tick²)
    pub const GRAVITY: f32 = 0.15;
    /// Velocity kept after a bounce
    pub const BOUNCE_FACTOR: f32 = 0.6;
    /// Vertical speed below which a ball is considered resting on a peg
    pub const RESTING_VY_THRESHOLD: f32 = 0.1;
    /// Downward push applied to a resting ball
    pub const RESTING_NUDGE: f32 = 0.1;
    /// Horizontal half-range of the resting nudge
    pub const RESTING_NUDGE_SPREAD: f32 = 0.1;

    /// House-edge drift
    pub const HORIZONTAL_DRIFT_FACTOR: f32 = 0.2;
    pub const BIAS_STRENGTH: f32 = 0.075;
    pub const DRIFT_MIN: f32 = 0.8;
    pub const DRIFT_MAX: f32 = 1.2;
    /// Neutral zone half-width, in peg radii
    pub const NEUTRAL_ZONE_PEG_RADII: f32 = 2.0;

    /// Anti-stuck recovery
    pub const MIN_VELOCITY_THRESHOLD: f32 = 0.05;
    pub const STUCK_FRAMES_THRESHOLD: u32 = 60;
    pub const JIGGLE_SPREAD_X: f32 = 0.05;
    pub const JIGGLE_MAX_Y: f32 = 0.1;

    /// Lifetime watchdog (simulated seconds)
    pub const MAX_LIFETIME_SECS: f64 = 20.0;

    /// Trail points kept per ball for rendering
    pub const TRAIL_LENGTH: usize = 20;
}
