//! Thread-safe engine handle and snapshot publisher.
//!
//! One mutex guards the simulation and the published [`Frame`]. A tick holds
//! it for its whole body (copy, update, pour, swap, publish), so a resize or
//! a spawn can never interleave with a half-finished tick and readers only
//! ever see committed frames.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::brush::BrushArea;
use crate::config::SimConfig;
use crate::error::Result;
use crate::frame::Frame;
use crate::grain::{Grain, Hsv};
use crate::simulation::Simulation;

/// Live pointer position in grid coordinates, written by the input layer.
#[derive(Debug, Default)]
pub struct Cursor {
    x: AtomicUsize,
    y: AtomicUsize,
}

impl Cursor {
    pub fn set(&self, x: usize, y: usize) {
        self.x.store(x, Ordering::Relaxed);
        self.y.store(y, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self) -> (usize, usize) {
        (self.x.load(Ordering::Relaxed), self.y.load(Ordering::Relaxed))
    }
}

struct State<R> {
    sim: Simulation<R>,
    published: Frame,
}

impl<R: Rng> State<R> {
    fn publish(&mut self) {
        let grid = self.sim.grid();
        self.published.copy_from(
            grid.width(),
            grid.height(),
            self.sim.ticks(),
            grid.current_cells(),
        );
    }
}

struct Shared<R> {
    state: Mutex<State<R>>,
    cursor: Arc<Cursor>,
}

/// Cloneable handle to one simulation shared by the driver and the renderer.
pub struct Engine<R = StdRng> {
    shared: Arc<Shared<R>>,
}

impl<R> Clone for Engine<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R> fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("cursor", &self.shared.cursor)
            .finish_non_exhaustive()
    }
}

impl Engine<StdRng> {
    /// Create an engine whose random source is seeded from OS entropy.
    pub fn new(width: usize, height: usize, config: SimConfig) -> Result<Self> {
        Self::with_rng(width, height, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(width: usize, height: usize, config: SimConfig, rng: R) -> Result<Self> {
        let sim = Simulation::new(width, height, config, rng)?;
        let mut state = State {
            sim,
            published: Frame::default(),
        };
        state.publish();
        log::info!("sand engine created at {width}x{height}");
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                cursor: Arc::new(Cursor::default()),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, State<R>> {
        // Every critical section leaves the buffers consistent, so a panic
        // elsewhere does not make the state unusable.
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Reallocate the grid at a new size and publish the fresh state.
    pub fn initialize(&self, width: usize, height: usize) -> Result<()> {
        let mut state = self.lock();
        state.sim.resize(width, height)?;
        state.publish();
        log::info!("sand engine reinitialized at {width}x{height}");
        Ok(())
    }

    /// Run one full tick and publish it. Returns the new tick count.
    pub fn tick(&self) -> u64 {
        let cursor = self.shared.cursor.get();
        let mut state = self.lock();
        state.sim.tick(cursor);
        state.publish();
        state.sim.ticks()
    }

    /// Paint a blob. It becomes visible in the frame after the next tick.
    pub fn spawn(&self, x: usize, y: usize, radius: usize, color: Option<Hsv>) -> BrushArea {
        self.lock().sim.spawn(x, y, radius, color)
    }

    pub fn toggle_pour(&self) -> bool {
        self.lock().sim.toggle_pour()
    }

    #[must_use]
    pub fn is_pouring(&self) -> bool {
        self.lock().sim.pour().is_active()
    }

    pub fn set_cell(&self, x: usize, y: usize, grain: Grain) {
        self.lock().sim.set_cell(x, y, grain);
    }

    /// Shared cursor read by the pour once per tick.
    #[must_use]
    pub fn cursor(&self) -> Arc<Cursor> {
        Arc::clone(&self.shared.cursor)
    }

    #[must_use]
    pub fn config(&self) -> SimConfig {
        self.lock().sim.config().clone()
    }

    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        let state = self.lock();
        (state.sim.width(), state.sim.height())
    }

    /// Copy of the last committed frame.
    #[must_use]
    pub fn frame(&self) -> Frame {
        self.lock().published.clone()
    }

    /// Like [`Engine::frame`] but reuses `frame`'s allocation.
    pub fn frame_into(&self, frame: &mut Frame) {
        let state = self.lock();
        let published = &state.published;
        frame.copy_from(
            published.width,
            published.height,
            published.tick,
            &published.grains,
        );
    }

    /// Render the last committed frame as row-major RGBA8.
    pub fn write_rgba(&self, out: &mut Vec<u8>) {
        self.lock().published.write_rgba(out);
    }
}
