//! Square brush used by spawn and the continuous pour.

use std::ops::Range;

use rand::Rng;

use crate::config::SimConfig;
use crate::grain::{Grain, Hsv};
use crate::grid::GridBuffers;

/// Cells painted by one brush stroke, after clamping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrushArea {
    pub radius: usize,
    pub x: Range<usize>,
    pub y: Range<usize>,
}

impl BrushArea {
    /// Clamp `radius` to half of either dimension and move the center so the
    /// whole brush stays on the grid.
    ///
    /// The painted square is `[cx - r, cx + r - 1) × [cy - r, cy + r - 1)`.
    #[must_use]
    pub fn clamped(width: usize, height: usize, x: usize, y: usize, radius: usize) -> Self {
        let radius = radius.min(width / 2).min(height / 2);
        if radius == 0 {
            return Self {
                radius,
                x: 0..0,
                y: 0..0,
            };
        }
        let cx = x.clamp(radius, width - radius);
        let cy = y.clamp(radius, height - radius);
        Self {
            radius,
            x: cx - radius..cx + radius - 1,
            y: cy - radius..cy + radius - 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.x
            .clone()
            .flat_map(move |x| self.y.clone().map(move |y| (x, y)))
    }
}

/// Sample a brush color from the configured ranges.
pub fn sample_color<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Hsv {
    Hsv::new(
        rng.gen_range(config.hue_range.clone()),
        rng.gen_range(config.saturation_range.clone()),
        rng.gen_range(config.value_range.clone()),
    )
}

/// Paint every cell of `area` into both buffers.
///
/// Saturation and value get independent per-cell jitter so blobs are not
/// flat-colored.
pub fn paint<R: Rng + ?Sized>(
    grid: &mut GridBuffers,
    area: &BrushArea,
    base: Hsv,
    jitter: f64,
    rng: &mut R,
) {
    for (x, y) in area.cells() {
        let hsv = Hsv::new(
            base.hue,
            jittered(base.saturation, jitter, rng),
            jittered(base.value, jitter, rng),
        );
        grid.set_both(x, y, Grain::from_hsv(hsv));
    }
}

fn jittered<R: Rng + ?Sized>(component: f64, jitter: f64, rng: &mut R) -> f64 {
    if jitter <= 0.0 {
        return component.clamp(0.0, 1.0);
    }
    (component + rng.gen_range(-jitter..=jitter)).clamp(0.0, 1.0)
}

/// Continuous pour state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pour {
    active: bool,
    color: Hsv,
}

impl Pour {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn color(&self) -> Hsv {
        self.color
    }

    /// Flip the pour on or off. Turning it on picks a fresh base color.
    pub fn toggle<R: Rng + ?Sized>(&mut self, config: &SimConfig, rng: &mut R) -> bool {
        self.active = !self.active;
        if self.active {
            self.color = sample_color(config, rng);
        }
        self.active
    }

    /// Advance the hue so consecutive pours read as distinct streams.
    pub fn drift(&mut self, degrees: f64) {
        self.color.hue = (self.color.hue + degrees).rem_euclid(360.0);
    }
}
