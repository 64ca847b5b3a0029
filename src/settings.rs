//! Simulation tuning and risk profiles
//!
//! Loaded from a JSON file next to the binary or built from defaults.
//! Missing fields fall back to `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Payout table presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RiskProfile {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Low => "Low",
            RiskProfile::Medium => "Medium",
            RiskProfile::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskProfile::Low),
            "medium" | "med" => Some(RiskProfile::Medium),
            "high" => Some(RiskProfile::High),
            _ => None,
        }
    }

    /// Multipliers from the outer edge to the center bucket (inclusive)
    pub fn half_table(&self) -> &'static [f64] {
        match self {
            RiskProfile::Low => &[1.9, 1.3, 1.2, 1.1, 1.0, 0.8, 0.6],
            RiskProfile::Medium => &[3.6, 1.6, 1.2, 1.0, 0.8, 0.6, 0.4],
            RiskProfile::High => &[6.0, 1.8, 1.1, 0.8, 0.5, 0.3, 0.2],
        }
    }

    /// Full left-to-right bucket multipliers (mirrored half table)
    pub fn multipliers(&self) -> Vec<f64> {
        let half = self.half_table();
        let mut table = half.to_vec();
        table.extend(half.iter().rev().skip(1));
        table
    }
}

/// What happens to a ball whose lifetime runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExpiryPolicy {
    /// Remove the ball; the stake stays debited
    #[default]
    Forfeit,
    /// Assign the nearest bucket and pay out as if it had landed
    NearestBucket,
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Payout table preset
    pub risk: RiskProfile,
    /// Explicit bucket multipliers (overrides `risk`)
    pub multipliers: Option<Vec<f64>>,

    // === Board ===
    pub rows: u32,
    pub peg_spacing: f32,
    pub row_spacing: f32,
    pub peg_top: f32,
    pub peg_radius: f32,
    pub ball_radius: f32,
    pub bucket_height: f32,
    pub spawn_jitter: f32,

    // === Physics ===
    pub gravity: f32,
    pub bounce_factor: f32,
    pub resting_vy_threshold: f32,
    pub resting_nudge: f32,
    /// Horizontal half-range of the resting nudge
    pub resting_nudge_spread: f32,

    // === House edge ===
    /// Center-favoring skew of the drift multiplier
    pub drift_bias: bool,
    pub horizontal_drift_factor: f32,
    pub bias_strength: f32,
    /// Neutral zone half-width, in peg radii
    pub neutral_zone: f32,

    // === Anti-stuck ===
    pub min_velocity_threshold: f32,
    pub stuck_frames_threshold: u32,
    /// Jiggle impulse: vx += U(-spread, spread), vy += U(0, max_y)
    pub jiggle_spread_x: f32,
    pub jiggle_max_y: f32,

    // === Lifecycle ===
    pub max_lifetime_secs: f64,
    pub expiry_policy: ExpiryPolicy,
    pub trail_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            risk: RiskProfile::Medium,
            multipliers: None,

            rows: ROWS,
            peg_spacing: PEG_SPACING,
            row_spacing: ROW_SPACING,
            peg_top: PEG_TOP,
            peg_radius: PEG_RADIUS,
            ball_radius: BALL_RADIUS,
            bucket_height: BUCKET_HEIGHT,
            spawn_jitter: SPAWN_JITTER,

            gravity: GRAVITY,
            bounce_factor: BOUNCE_FACTOR,
            resting_vy_threshold: RESTING_VY_THRESHOLD,
            resting_nudge: RESTING_NUDGE,
            resting_nudge_spread: RESTING_NUDGE_SPREAD,

            drift_bias: true,
            horizontal_drift_factor: HORIZONTAL_DRIFT_FACTOR,
            bias_strength: BIAS_STRENGTH,
            neutral_zone: NEUTRAL_ZONE_PEG_RADII,

            min_velocity_threshold: MIN_VELOCITY_THRESHOLD,
            stuck_frames_threshold: STUCK_FRAMES_THRESHOLD,
            jiggle_spread_x: JIGGLE_SPREAD_X,
            jiggle_max_y: JIGGLE_MAX_Y,

            max_lifetime_secs: MAX_LIFETIME_SECS,
            expiry_policy: ExpiryPolicy::Forfeit,
            trail_length: TRAIL_LENGTH,
        }
    }
}

impl Settings {
    /// Create settings from a risk preset
    pub fn from_risk(risk: RiskProfile) -> Self {
        Self {
            risk,
            ..Self::default()
        }
    }

    /// Left-to-right bucket multipliers in effect
    pub fn bucket_multipliers(&self) -> Vec<f64> {
        match &self.multipliers {
            Some(table) => table.clone(),
            None => self.risk.multipliers(),
        }
    }

    /// Neutral zone half-width in pixels
    pub fn neutral_zone_width(&self) -> f32 {
        self.neutral_zone * self.peg_radius
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("peg_spacing", self.peg_spacing)?;
        positive("row_spacing", self.row_spacing)?;
        positive("peg_radius", self.peg_radius)?;
        positive("ball_radius", self.ball_radius)?;
        positive("gravity", self.gravity)?;
        non_negative("peg_top", self.peg_top)?;
        non_negative("bucket_height", self.bucket_height)?;
        non_negative("spawn_jitter", self.spawn_jitter)?;
        non_negative("resting_vy_threshold", self.resting_vy_threshold)?;
        non_negative("resting_nudge", self.resting_nudge)?;
        non_negative("resting_nudge_spread", self.resting_nudge_spread)?;
        non_negative("jiggle_spread_x", self.jiggle_spread_x)?;
        non_negative("jiggle_max_y", self.jiggle_max_y)?;
        non_negative("horizontal_drift_factor", self.horizontal_drift_factor)?;
        non_negative("bias_strength", self.bias_strength)?;
        non_negative("neutral_zone", self.neutral_zone)?;
        non_negative("min_velocity_threshold", self.min_velocity_threshold)?;

        // One push-out must leave the ball clear of every other peg
        let min_gap = 2.0 * (self.ball_radius + self.peg_radius);
        if self.peg_spacing < min_gap {
            return Err(invalid("peg_spacing", "pegs in a row must be at least two ball-plus-peg radii apart"));
        }
        if self.rows > 1 && (self.peg_spacing / 2.0).hypot(self.row_spacing) < min_gap {
            return Err(invalid("row_spacing", "pegs in adjacent rows are too close together"));
        }
        if self.rows > 2 && 2.0 * self.row_spacing < min_gap {
            return Err(invalid("row_spacing", "aligned pegs two rows apart are too close together"));
        }

        if !(self.bounce_factor > 0.0 && self.bounce_factor <= 1.0) {
            return Err(invalid("bounce_factor", "must be in (0, 1]"));
        }
        if !(self.max_lifetime_secs.is_finite() && self.max_lifetime_secs > 0.0) {
            return Err(invalid("max_lifetime_secs", "must be a positive number"));
        }

        let table = self.bucket_multipliers();
        if table.is_empty() {
            return Err(invalid("multipliers", "at least one bucket is required"));
        }
        if table.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(invalid("multipliers", "must be finite and non-negative"));
        }
        if table.iter().ne(table.iter().rev()) {
            return Err(invalid("multipliers", "table must be symmetric"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a non-negative number"))
    }
}
