//! Errors surfaced by the engine.
//!
//! Coordinates and brush sizes never fail; they are clamped. Only a degenerate
//! or oversized grid, a bad configuration, or a failed thread spawn is
//! reported to the caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Width or height was zero, or the grid is too large to allocate.
    #[error("invalid grid dimensions {width}x{height}: both must be at least 1 and the grid must fit in memory")]
    InvalidDimensions { width: usize, height: usize },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The background driver thread could not be started.
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(String),
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
