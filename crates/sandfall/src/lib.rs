//! Falling sand simulation engine.
//!
//! Grains fall straight down when they can, otherwise slide onto a free
//! diagonal, and pile up. [`Simulation`] is the single-threaded world;
//! [`Engine`] shares one behind a lock and publishes a [`Frame`] after every
//! tick; [`Driver`] ticks an engine on its own thread.
//!
//! ```no_run
//! use sandfall::{Driver, Engine, SimConfig};
//!
//! let engine = Engine::new(320, 180, SimConfig::default())?;
//! let driver = Driver::start(engine.clone())?;
//! engine.spawn(160, 40, 8, None);
//! let frame = engine.frame();
//! # let _ = frame;
//! driver.join();
//! # Ok::<(), sandfall::SimError>(())
//! ```

pub mod api;
pub mod brush;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod frame;
pub mod grain;
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod wasm;


pub use brush::BrushArea;
pub use config::SimConfig;
pub use driver::Driver;
pub use engine::{Cursor, Engine};
pub use error::SimError;
pub use frame::Frame;
pub use grain::{Grain, Hsv, Rgb};
pub use grid::GridBuffers;
pub use simulation::Simulation;
pub use wasm::Universe;
