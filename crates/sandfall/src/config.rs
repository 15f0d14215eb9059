//! Engine tuning knobs.

use std::ops::{Range, RangeInclusive};
use std::time::Duration;

use crate::error::{Result, SimError};

/// Rows of solid grains seeded at the top of a freshly sized grid.
pub const DEFAULT_CEILING_ROWS: usize = 10;
/// Brush radius used by the continuous pour.
pub const DEFAULT_POUR_RADIUS: usize = 3;
/// Degrees the pour hue advances every tick.
pub const DEFAULT_POUR_HUE_DRIFT: f64 = 0.25;
/// Per-cell saturation/value jitter applied when painting.
pub const DEFAULT_COLOR_JITTER: f64 = 0.05;

/// Static configuration for an engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Top rows filled with solid grains on every resize, capped at `height - 1`.
    pub ceiling_rows: usize,
    pub pour_radius: usize,
    pub pour_hue_drift: f64,
    /// Hue is sampled from this half-open range when a brush has no color.
    pub hue_range: Range<f64>,
    pub saturation_range: RangeInclusive<f64>,
    pub value_range: RangeInclusive<f64>,
    pub color_jitter: f64,
    /// Minimum wall time per tick for the background driver. `None` runs flat out.
    pub tick_interval: Option<Duration>,
    /// How often the driver reports tick timing at debug level.
    pub timing_log_interval: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ceiling_rows: DEFAULT_CEILING_ROWS,
            pour_radius: DEFAULT_POUR_RADIUS,
            pour_hue_drift: DEFAULT_POUR_HUE_DRIFT,
            hue_range: 0.0..360.0,
            saturation_range: 0.25..=0.75,
            value_range: 0.625..=0.875,
            color_jitter: DEFAULT_COLOR_JITTER,
            tick_interval: None,
            timing_log_interval: Duration::from_secs(10),
        }
    }
}

impl SimConfig {
    #[must_use]
    pub fn with_ceiling_rows(mut self, rows: usize) -> Self {
        self.ceiling_rows = rows;
        self
    }

    #[must_use]
    pub fn with_pour_radius(mut self, radius: usize) -> Self {
        self.pour_radius = radius;
        self
    }

    #[must_use]
    pub fn with_pour_hue_drift(mut self, degrees: f64) -> Self {
        self.pour_hue_drift = degrees;
        self
    }

    #[must_use]
    pub fn with_color_jitter(mut self, jitter: f64) -> Self {
        self.color_jitter = jitter;
        self
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Option<Duration>) -> Self {
        self.tick_interval = interval;
        self
    }

    #[must_use]
    pub fn with_timing_log_interval(mut self, interval: Duration) -> Self {
        self.timing_log_interval = interval;
        self
    }

    /// Checks every field, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        if !(self.hue_range.start >= 0.0
            && self.hue_range.end <= 360.0
            && self.hue_range.start < self.hue_range.end)
        {
            return Err(SimError::InvalidConfig(
                "hue_range must be a non-empty range inside [0, 360]",
            ));
        }
        if !unit_range(&self.saturation_range) {
            return Err(SimError::InvalidConfig(
                "saturation_range must be a non-empty range inside [0, 1]",
            ));
        }
        if !unit_range(&self.value_range) {
            return Err(SimError::InvalidConfig(
                "value_range must be a non-empty range inside [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.color_jitter) {
            return Err(SimError::InvalidConfig("color_jitter must lie in [0, 1]"));
        }
        if !self.pour_hue_drift.is_finite() {
            return Err(SimError::InvalidConfig("pour_hue_drift must be finite"));
        }
        if self.timing_log_interval.is_zero() {
            return Err(SimError::InvalidConfig(
                "timing_log_interval must be non-zero",
            ));
        }
        Ok(())
    }
}

fn unit_range(range: &RangeInclusive<f64>) -> bool {
    *range.start() >= 0.0 && *range.end() <= 1.0 && range.start() <= range.end()
}
