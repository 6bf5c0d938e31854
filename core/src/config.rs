//! Startup parameters for a session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_WIDTH: u32 = 80;
const DEFAULT_HEIGHT: u32 = 50;
const DEFAULT_MESSAGE_ROWS: u32 = 6;
const DEFAULT_MARKER_COUNT: usize = 10;

/// Inclusive range of sizes sampled by the digger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    /// Smallest permitted size.
    pub min: u32,
    /// Largest permitted size.
    pub max: u32,
}

impl SizeRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min >= 1 && self.min <= self.max
    }
}

/// Tuning knobs for the room-and-corridor digger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiggerConfig {
    /// Width range of carved rooms, walls excluded.
    pub room_width: SizeRange,
    /// Height range of carved rooms, walls excluded.
    pub room_height: SizeRange,
    /// Length range of carved corridors.
    pub corridor_length: SizeRange,
    /// Fraction of the interior the digger aims to carve before stopping.
    pub dug_percentage: f64,
    /// Upper bound on feature placement attempts.
    pub max_attempts: u32,
}

impl Default for DiggerConfig {
    fn default() -> Self {
        Self {
            room_width: SizeRange::new(3, 9),
            room_height: SizeRange::new(3, 5),
            corridor_length: SizeRange::new(3, 10),
            dug_percentage: 0.2,
            max_attempts: 10_000,
        }
    }
}

/// Session configuration shared by the generator and the adapters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the display in cells.
    pub width: u32,
    /// Height of the display in cells, message rows included.
    pub height: u32,
    /// Rows at the bottom of the display reserved for the message log.
    pub message_rows: u32,
    /// Number of boxes to hide; the first one placed holds the ananas.
    pub marker_count: usize,
    /// Seed for the session's random source. `None` lets the adapter pick one.
    pub seed: Option<u64>,
    /// Digger tuning.
    pub digger: DiggerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            message_rows: DEFAULT_MESSAGE_ROWS,
            marker_count: DEFAULT_MARKER_COUNT,
            seed: None,
            digger: DiggerConfig::default(),
        }
    }
}

impl GameConfig {
    /// Height of the area available to the dungeon.
    #[must_use]
    pub fn play_height(&self) -> u32 {
        self.height.saturating_sub(self.message_rows)
    }

    /// Checks the configuration for values the engine cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.play_height() == 0 {
            return Err(ConfigError::EmptyPlayArea {
                width: self.width,
                height: self.height,
                message_rows: self.message_rows,
            });
        }

        if self.marker_count == 0 {
            return Err(ConfigError::NoMarkers);
        }

        let digger = &self.digger;
        for (name, range) in [
            ("room_width", digger.room_width),
            ("room_height", digger.room_height),
            ("corridor_length", digger.corridor_length),
        ] {
            if !range.is_valid() {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if !(digger.dug_percentage > 0.0 && digger.dug_percentage <= 1.0) {
            return Err(ConfigError::InvalidDugPercentage(digger.dug_percentage));
        }

        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The message rows consume the whole display, or a dimension is zero.
    #[error("a {width}x{height} display with {message_rows} message rows leaves no play area")]
    EmptyPlayArea {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
        /// Configured message rows.
        message_rows: u32,
    },
    /// No boxes were requested, so the goal cannot be placed.
    #[error("marker_count must be at least 1")]
    NoMarkers,
    /// A digger size range is empty or starts at zero.
    #[error("digger range {name} must satisfy 1 <= min <= max (got {min}..={max})")]
    InvalidRange {
        /// Name of the offending range.
        name: &'static str,
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// The dug percentage lies outside `(0, 1]`.
    #[error("dug_percentage must lie in (0, 1] (got {0})")]
    InvalidDugPercentage(f64),
}
