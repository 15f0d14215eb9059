//! Relative-offset view of the current buffer around one cell.

use crate::grid::GridBuffers;

/// Reads only the current (pre-tick) buffer, so every decision in a tick
/// sees the same snapshot.
///
/// Negative offsets saturate at column 0 and columns past the right edge
/// fold back onto the last column (see [`GridBuffers::index`]).
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    pub grid: &'a GridBuffers,
    pub x: usize,
    pub y: usize,
}

impl<'a> Neighborhood<'a> {
    #[must_use]
    pub fn new(grid: &'a GridBuffers, x: usize, y: usize) -> Self {
        Self { grid, x, y }
    }

    #[must_use]
    pub fn occupied(&self, dx: isize, dy: usize) -> bool {
        self.grid
            .occupied(self.x.saturating_add_signed(dx), self.y + dy)
    }

    #[must_use]
    pub fn on_floor(&self) -> bool {
        self.y + 1 >= self.grid.height()
    }

    #[must_use]
    pub fn below(&self) -> bool {
        self.occupied(0, 1)
    }

    /// The left edge counts as a wall.
    #[must_use]
    pub fn left(&self) -> bool {
        self.x < 1 || self.occupied(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> bool {
        self.occupied(1, 0)
    }

    #[must_use]
    pub fn down_left(&self) -> bool {
        self.occupied(-1, 1)
    }

    #[must_use]
    pub fn down_right(&self) -> bool {
        self.occupied(1, 1)
    }
}
