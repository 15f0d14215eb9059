//! Background thread that ticks an [`Engine`] until told to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::engine::Engine;
use crate::error::{Result, SimError};

/// Owns the simulation thread. Dropping it stops and joins the loop.
#[derive(Debug)]
pub struct Driver {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Driver {
    /// Spawn the tick loop on a dedicated thread.
    ///
    /// Runs as fast as it can unless the engine's config sets a
    /// `tick_interval`.
    pub fn start<R>(engine: Engine<R>) -> Result<Self>
    where
        R: Rng + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let config = engine.config();
        let handle = thread::Builder::new()
            .name("sand-sim".into())
            .spawn(move || {
                run_loop(&engine, &flag, config.tick_interval, config.timing_log_interval);
            })
            .map_err(|e| SimError::Spawn(e.to_string()))?;
        log::info!("simulation driver started");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Ask the loop to exit after its current tick. Safe to call repeatedly.
    pub fn stop(&self) {
        if !self.stop.swap(true, Ordering::AcqRel) {
            log::info!("simulation driver stopping");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the loop and wait for the in-flight tick to finish.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("simulation thread panicked");
            }
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop<R: Rng>(
    engine: &Engine<R>,
    stop: &AtomicBool,
    tick_interval: Option<Duration>,
    report_every: Duration,
) {
    let mut window_start = Instant::now();
    let mut window_ticks: u32 = 0;
    let mut window_busy = Duration::ZERO;

    while !stop.load(Ordering::Acquire) {
        let started = Instant::now();
        let tick = engine.tick();
        let elapsed = started.elapsed();

        window_ticks += 1;
        window_busy += elapsed;
        if window_start.elapsed() >= report_every {
            log::debug!(
                "tick {tick}: {window_ticks} ticks in {:?}, {:?} avg",
                window_start.elapsed(),
                window_busy / window_ticks
            );
            window_start = Instant::now();
            window_ticks = 0;
            window_busy = Duration::ZERO;
        }

        if let Some(rest) = tick_interval.and_then(|interval| interval.checked_sub(elapsed)) {
            thread::sleep(rest);
        }
    }
}
