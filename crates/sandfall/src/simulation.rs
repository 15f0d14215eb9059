//! Single-threaded simulation state: grid, random source and pour.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::Neighborhood;
use crate::brush::{self, BrushArea, Pour};
use crate::config::SimConfig;
use crate::error::Result;
use crate::grain::{Grain, Hsv};
use crate::grid::GridBuffers;
use crate::physics::resolve_grain;

/// The sand world. Not synchronized; [`crate::Engine`] adds the lock.
#[derive(Debug)]
pub struct Simulation<R = StdRng> {
    config: SimConfig,
    grid: GridBuffers,
    rng: R,
    pour: Pour,
    ticks: u64,
}

impl Simulation<StdRng> {
    /// Build a simulation seeded from OS entropy.
    pub fn from_entropy(width: usize, height: usize, config: SimConfig) -> Result<Self> {
        Self::new(width, height, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Simulation<R> {
    pub fn new(width: usize, height: usize, config: SimConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let grid = GridBuffers::new(width, height, config.ceiling_rows)?;
        Ok(Self {
            config,
            grid,
            rng,
            pour: Pour::default(),
            ticks: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &GridBuffers {
        &self.grid
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Number of completed ticks since construction or the last resize.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn pour(&self) -> &Pour {
        &self.pour
    }

    /// Throw the world away and start over at the new size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        self.grid.resize(width, height, self.config.ceiling_rows)?;
        self.ticks = 0;
        Ok(())
    }

    /// Advance one step.
    ///
    /// Every decision reads the pre-tick buffer; moves land in the working
    /// buffer, which becomes current at the end. `cursor` is where an active
    /// pour paints this tick.
    pub fn tick(&mut self, cursor: (usize, usize)) {
        self.grid.begin_tick();

        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                if !self.grid.occupied(x, y) {
                    continue;
                }
                let step = resolve_grain(&Neighborhood::new(&self.grid, x, y), &mut self.rng);
                if let Some(target) = step.target(x, y) {
                    self.grid.swap_working((x, y), target);
                }
            }
        }

        if self.pour.is_active() {
            let color = self.pour.color();
            self.spawn(cursor.0, cursor.1, self.config.pour_radius, Some(color));
            self.pour.drift(self.config.pour_hue_drift);
        }

        self.grid.swap_roles();
        self.ticks += 1;
    }

    /// Paint a square blob of grains. Without a color one is sampled.
    ///
    /// Radius and center are clamped so the blob fits on the grid; the
    /// painted area is returned.
    pub fn spawn(&mut self, x: usize, y: usize, radius: usize, color: Option<Hsv>) -> BrushArea {
        let area = BrushArea::clamped(self.grid.width(), self.grid.height(), x, y, radius);
        let base = match color {
            Some(color) => color,
            None => brush::sample_color(&self.config, &mut self.rng),
        };
        brush::paint(
            &mut self.grid,
            &area,
            base,
            self.config.color_jitter,
            &mut self.rng,
        );
        log::trace!("spawned {} grains in {:?} x {:?}", area.len(), area.x, area.y);
        area
    }

    /// Start or stop the continuous pour, returning the new state.
    pub fn toggle_pour(&mut self) -> bool {
        let active = self.pour.toggle(&self.config, &mut self.rng);
        log::debug!(
            "pour {} (hue {:.1})",
            if active { "started" } else { "stopped" },
            self.pour.color().hue
        );
        active
    }

    /// Overwrite one cell in both buffers.
    pub fn set_cell(&mut self, x: usize, y: usize, grain: Grain) {
        self.grid.set_both(x, y, grain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use proptest::prelude::*;

    fn empty_sim(width: usize, height: usize, seed: u64) -> Simulation {
        let config = SimConfig::default().with_ceiling_rows(0);
        Simulation::new(width, height, config, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn single_grain_falls_one_row() {
        let mut sim = empty_sim(3, 3, 0);
        sim.set_cell(1, 0, Grain::solid());
        sim.tick((0, 0));
        assert!(sim.grid().occupied(1, 1));
        assert!(!sim.grid().occupied(1, 0));
        assert_eq!(sim.grid().count_occupied(), 1);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn grain_on_full_floor_rests() {
        let mut sim = empty_sim(3, 2, 0);
        for x in 0..3 {
            sim.set_cell(x, 1, Grain::solid());
        }
        sim.set_cell(1, 0, Grain::solid());
        sim.tick((0, 0));
        assert!(sim.grid().occupied(1, 0));
        for x in 0..3 {
            assert!(sim.grid().occupied(x, 1));
        }
    }

    #[test]
    fn full_row_on_full_floor_is_boxed_in() {
        let mut sim = empty_sim(3, 2, 0);
        for x in 0..3 {
            sim.set_cell(x, 0, Grain::solid());
            sim.set_cell(x, 1, Grain::solid());
        }
        let before = sim.grid().current_cells().to_vec();
        sim.tick((0, 0));
        assert_eq!(sim.grid().current_cells(), before.as_slice());
    }

    #[test]
    fn decisions_use_the_pre_tick_state() {
        // A two-grain column: the lower grain falls, but the upper one still
        // sees it in place and slides off diagonally instead of following.
        let mut sim = empty_sim(3, 4, 9);
        sim.set_cell(1, 0, Grain::solid());
        sim.set_cell(1, 1, Grain::solid());
        sim.tick((0, 0));

        let grid = sim.grid();
        assert!(!grid.occupied(1, 0));
        assert!(!grid.occupied(1, 1));
        assert!(grid.occupied(1, 2));
        assert!(grid.occupied(0, 1) ^ grid.occupied(2, 1));
    }

    #[test]
    fn grain_keeps_its_color_while_falling() {
        let mut sim = empty_sim(4, 6, 0);
        sim.set_cell(2, 0, Grain::from_rgb(10, 20, 30));
        for _ in 0..10 {
            sim.tick((0, 0));
        }
        assert_eq!(*sim.grid().read(2, 5), Grain::from_rgb(10, 20, 30));
    }

    #[test]
    fn ceiling_falls_as_a_block() {
        let config = SimConfig::default().with_ceiling_rows(2);
        let mut sim = Simulation::new(5, 6, config, StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(sim.grid().count_occupied(), 10);
        sim.tick((0, 0));
        for x in 0..5 {
            // The lower row falls; the top row sees full neighbors and holds.
            assert!(sim.grid().occupied(x, 0));
            assert!(!sim.grid().occupied(x, 1));
            assert!(sim.grid().occupied(x, 2));
        }
        assert_eq!(sim.grid().count_occupied(), 10);
    }

    #[test]
    fn spawn_paints_clamped_square() {
        let mut sim = empty_sim(20, 20, 2);
        let area = sim.spawn(0, 0, 4, None);
        assert_eq!(area.x, 0..7);
        assert_eq!(area.y, 0..7);
        assert_eq!(sim.grid().count_occupied(), 49);
    }

    #[test]
    fn spawn_with_explicit_color_uses_its_hue() {
        let config = SimConfig::default()
            .with_ceiling_rows(0)
            .with_color_jitter(0.0);
        let mut sim = Simulation::new(10, 10, config, StdRng::seed_from_u64(0)).unwrap();
        let area = sim.spawn(5, 5, 2, Some(Hsv::new(240.0, 1.0, 1.0)));
        for (x, y) in area.cells() {
            assert_eq!(*sim.grid().read(x, y), Grain::from_rgb(0, 0, 255));
        }
    }

    #[test]
    fn pour_paints_at_cursor_each_tick() {
        let mut sim = empty_sim(20, 20, 4);
        assert!(sim.toggle_pour());
        let hue = sim.pour().color().hue;

        sim.tick((10, 10));
        let area = BrushArea::clamped(20, 20, 10, 10, sim.config().pour_radius);
        assert_eq!(sim.grid().count_occupied(), area.len());
        for (x, y) in area.cells() {
            assert!(sim.grid().occupied(x, y));
        }
        let drifted = (hue + sim.config().pour_hue_drift).rem_euclid(360.0);
        assert!((sim.pour().color().hue - drifted).abs() < 1e-9);

        assert!(!sim.toggle_pour());
        let count = sim.grid().count_occupied();
        sim.tick((10, 10));
        assert_eq!(sim.grid().count_occupied(), count);
    }

    #[test]
    fn resize_resets_world() {
        let mut sim = empty_sim(8, 8, 0);
        sim.spawn(4, 4, 2, None);
        sim.tick((0, 0));
        sim.resize(12, 5).unwrap();
        assert_eq!((sim.width(), sim.height()), (12, 5));
        assert_eq!(sim.grid().count_occupied(), 0);
        assert_eq!(sim.ticks(), 0);

        assert_eq!(
            sim.resize(0, 5),
            Err(SimError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert_eq!((sim.width(), sim.height()), (12, 5));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig::default().with_color_jitter(2.0);
        let err = Simulation::new(4, 4, config, StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    proptest! {
        #[test]
        fn prop_tick_conserves_grains(
            cells in proptest::collection::vec(any::<bool>(), 16 * 12),
            seed in any::<u64>(),
            ticks in 1usize..8,
        ) {
            let mut sim = empty_sim(16, 12, seed);
            for (i, &occupied) in cells.iter().enumerate() {
                if occupied {
                    sim.set_cell(i / 12, i % 12, Grain::solid());
                }
            }
            let before = sim.grid().count_occupied();
            for _ in 0..ticks {
                sim.tick((0, 0));
                prop_assert_eq!(sim.grid().count_occupied(), before);
            }
        }

        #[test]
        fn prop_floor_grains_never_move(
            cells in proptest::collection::vec(any::<bool>(), 16 * 12),
            seed in any::<u64>(),
        ) {
            let mut sim = empty_sim(16, 12, seed);
            for (i, &occupied) in cells.iter().enumerate() {
                if occupied {
                    sim.set_cell(i / 12, i % 12, Grain::from_rgb(1, (i % 256) as u8, 3));
                }
            }
            let floor: Vec<Grain> = (0..16).map(|x| *sim.grid().read(x, 11)).collect();
            sim.tick((0, 0));
            for (x, grain) in floor.iter().enumerate() {
                if grain.is_occupied() {
                    prop_assert_eq!(sim.grid().read(x, 11), grain);
                }
            }
            prop_assert_eq!(sim.grid().current_cells().len(), 16 * 12);
        }

        #[test]
        fn prop_lone_grain_falls_straight(
            x in 0usize..16,
            y in 0usize..11,
        ) {
            let mut sim = empty_sim(16, 12, 0);
            sim.set_cell(x, y, Grain::solid());
            sim.tick((0, 0));
            prop_assert!(sim.grid().occupied(x, y + 1));
            prop_assert!(!sim.grid().occupied(x, y));
        }
    }
}
