//! Browser entry point.
//!
//! The web host has no background thread to give the simulation, so it calls
//! `tick()` once per animation frame and reads pixels straight out of WASM
//! memory through `frame_ptr()`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::config::SimConfig;
use crate::error::Result;
use crate::frame::Frame;
use crate::grain::{Grain, Hsv};
use crate::simulation::Simulation;

#[wasm_bindgen]
#[derive(Debug)]
pub struct Universe {
    sim: Simulation<StdRng>,
    cursor: (usize, usize),
    frame: Frame,
    pixels: Vec<u8>,
}

/// `JsError` can only be built inside a JS host, so the throwing wrappers
/// exist on wasm32 alone. Native callers use `try_new` and `try_resize`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl Universe {
    /// # Errors
    /// Throws when the dimensions are zero or too large.
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize, seed: u64) -> Result<Universe, JsError> {
        Self::try_new(width, height, seed).map_err(JsError::from)
    }

    /// # Errors
    /// Throws when the dimensions are zero or too large; the old grid is kept.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), JsError> {
        self.try_resize(width, height).map_err(JsError::from)
    }
}

#[wasm_bindgen]
impl Universe {
    pub fn tick(&mut self) {
        self.sim.tick(self.cursor);
        self.refresh();
    }

    /// Paint a blob with a sampled color.
    pub fn spawn(&mut self, x: usize, y: usize, radius: usize) {
        self.sim.spawn(x, y, radius, None);
    }

    /// Paint a blob with an explicit HSV color.
    pub fn spawn_hsv(
        &mut self,
        x: usize,
        y: usize,
        radius: usize,
        hue: f64,
        saturation: f64,
        value: f64,
    ) {
        self.sim
            .spawn(x, y, radius, Some(Hsv::new(hue, saturation, value)));
    }

    pub fn toggle_pour(&mut self) -> bool {
        self.sim.toggle_pour()
    }

    pub fn set_cursor(&mut self, x: usize, y: usize) {
        self.cursor = (x, y);
    }

    pub fn set_cell(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
        self.sim.set_cell(x, y, Grain::from_rgb(r, g, b));
    }

    pub fn clear_cell(&mut self, x: usize, y: usize) {
        self.sim.set_cell(x, y, Grain::empty());
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.sim.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.sim.height()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.sim.ticks()
    }

    /// Row-major RGBA8 pixels of the last tick, `width * height * 4` bytes.
    #[must_use]
    pub fn frame_ptr(&self) -> *const u8 {
        self.pixels.as_ptr()
    }

    #[must_use]
    pub fn frame_len(&self) -> usize {
        self.pixels.len()
    }
}

impl Universe {
    /// # Errors
    /// Fails when the dimensions are zero or too large.
    pub fn try_new(width: usize, height: usize, seed: u64) -> Result<Self> {
        let sim = Simulation::new(
            width,
            height,
            SimConfig::default(),
            StdRng::seed_from_u64(seed),
        )?;
        let mut universe = Self {
            sim,
            cursor: (0, 0),
            frame: Frame::default(),
            pixels: Vec::new(),
        };
        universe.refresh();
        Ok(universe)
    }

    /// # Errors
    /// Fails when the dimensions are zero or too large; the old grid and
    /// pixels are kept.
    pub fn try_resize(&mut self, width: usize, height: usize) -> Result<()> {
        self.sim.resize(width, height)?;
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        let grid = self.sim.grid();
        self.frame.copy_from(
            grid.width(),
            grid.height(),
            self.sim.ticks(),
            grid.current_cells(),
        );
        self.frame.write_rgba(&mut self.pixels);
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn universe_publishes_pixels_on_tick() {
        let mut universe = Universe::try_new(8, 12, 1).unwrap();
        assert_eq!(universe.frame_len(), 8 * 12 * 4);
        // Default ceiling: ten solid black rows, opaque black everywhere.
        assert!(universe.pixels().chunks_exact(4).all(|p| p == [0u8, 0, 0, 255].as_slice()));

        universe.set_cell(3, 11, 200, 100, 50);
        universe.tick();
        let offset = (11 * 8 + 3) * 4;
        assert_eq!(&universe.pixels()[offset..offset + 4], &[200, 100, 50, 255]);
        assert_eq!(universe.ticks(), 1);
    }

    #[test]
    fn universe_resize_and_pour() {
        let mut universe = Universe::try_new(8, 8, 2).unwrap();
        universe.try_resize(20, 16).unwrap();
        assert_eq!((universe.width(), universe.height()), (20, 16));
        assert_eq!(universe.frame_len(), 20 * 16 * 4);

        universe.set_cursor(10, 14);
        assert!(universe.toggle_pour());
        universe.tick();
        assert!(!universe.toggle_pour());
    }

    #[test]
    fn universe_reports_bad_dimensions() {
        assert_eq!(
            Universe::try_new(0, 4, 1).unwrap_err(),
            SimError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
        assert!(Universe::try_new(usize::MAX, 2, 1).is_err());

        let mut universe = Universe::try_new(6, 5, 3).unwrap();
        universe.set_cell(2, 4, 10, 20, 30);
        universe.tick();
        let before = universe.pixels().to_vec();

        assert!(universe.try_resize(6, 0).is_err());
        assert_eq!((universe.width(), universe.height()), (6, 5));
        assert_eq!(universe.pixels(), before.as_slice());
    }
}
