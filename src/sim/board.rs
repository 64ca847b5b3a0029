//! Board layout: triangular peg field above a row of payout buckets
//!
//! The layout is a pure function of the board dimensions and settings.
//! It is rebuilt whenever the rendering surface resizes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// A fixed circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub radius: f32,
}

/// A payout slot in the bucket band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub x_start: f32,
    pub width: f32,
    pub multiplier: f64,
    pub label: String,
}

impl Bucket {
    /// Half-open range test: `[x_start, x_start + width)`
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x_start && x < self.x_start + self.width
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.x_start + self.width / 2.0
    }
}

/// Immutable board layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub width: f32,
    pub height: f32,
    /// Top edge of the bucket band
    pub bucket_top: f32,
    /// Pegs in row-major order, left to right within a row
    pub pegs: Vec<Peg>,
    /// Buckets left to right, spanning the full width
    pub buckets: Vec<Bucket>,
}

impl Board {
    /// A board with no pegs or buckets. Never ready.
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            bucket_top: 0.0,
            pegs: Vec::new(),
            buckets: Vec::new(),
        }
    }

    /// Build the layout for a `width` x `height` surface
    ///
    /// Row `r` holds `r + 3` pegs, centered horizontally. Rows that would
    /// reach into the bucket band are dropped, as are pegs that leave less
    /// than a ball diameter between their surface and a side wall. Zero,
    /// negative or non-finite dimensions yield an empty board.
    pub fn generate(width: f32, height: f32, settings: &Settings) -> Self {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Self::empty(width, height);
        }

        let bucket_top = (height - settings.bucket_height).max(0.0);
        let center = width / 2.0;
        let peg_radius = settings.peg_radius;
        // A ball clamped against a wall must still clear the outermost pegs
        let wall_clearance = peg_radius + 2.0 * settings.ball_radius;

        let mut pegs = Vec::new();
        for row in 0..settings.rows {
            let y = settings.peg_top + row as f32 * settings.row_spacing;
            if y + peg_radius >= bucket_top {
                break;
            }

            let count = row + 3;
            let row_width = (count - 1) as f32 * settings.peg_spacing;
            let start_x = center - row_width / 2.0;
            for col in 0..count {
                let x = start_x + col as f32 * settings.peg_spacing;
                if x < wall_clearance || x > width - wall_clearance {
                    continue;
                }
                pegs.push(Peg {
                    pos: Vec2::new(x, y),
                    radius: peg_radius,
                });
            }
        }

        let multipliers = settings.bucket_multipliers();
        let bucket_width = width / multipliers.len().max(1) as f32;
        let buckets = multipliers
            .into_iter()
            .enumerate()
            .map(|(i, multiplier)| Bucket {
                x_start: i as f32 * bucket_width,
                width: bucket_width,
                multiplier,
                label: format!("{}x", multiplier),
            })
            .collect();

        Self {
            width,
            height,
            bucket_top,
            pegs,
            buckets,
        }
    }

    /// Whether drops can be accepted on this board
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && !self.buckets.is_empty()
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}
