//! Double-buffered grain storage.
//!
//! Cells live in two equally sized column-major buffers (`x * height + y`).
//! During a tick one buffer is *current* and read-only, the other is
//! *working* and receives every move; `swap_roles` promotes working to
//! current once the tick is done.

use crate::error::{Result, SimError};
use crate::grain::Grain;

/// Cells in a `width × height` grid, rejecting empty grids and any size whose
/// RGBA frame would not fit in memory.
fn cell_count(width: usize, height: usize) -> Result<usize> {
    let invalid = SimError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid);
    }
    width
        .checked_mul(height)
        .filter(|len| len.checked_mul(4).is_some_and(|bytes| bytes <= isize::MAX as usize))
        .ok_or(invalid)
}

#[derive(Debug, Clone)]
pub struct GridBuffers {
    width: usize,
    height: usize,
    buffers: [Vec<Grain>; 2],
    /// Which of `buffers` is current; the other one is working.
    current: usize,
}

impl GridBuffers {
    /// Allocate an empty grid and seed `ceiling_rows` rows of solid grains at the top.
    pub fn new(width: usize, height: usize, ceiling_rows: usize) -> Result<Self> {
        let mut grid = Self {
            width: 0,
            height: 0,
            buffers: [Vec::new(), Vec::new()],
            current: 0,
        };
        grid.resize(width, height, ceiling_rows)?;
        Ok(grid)
    }

    /// Reallocate both buffers. Prior contents are discarded.
    ///
    /// On error the grid is left exactly as it was.
    pub fn resize(&mut self, width: usize, height: usize, ceiling_rows: usize) -> Result<()> {
        let len = cell_count(width, height)?;
        for buffer in &mut self.buffers {
            buffer.clear();
            buffer.resize(len, Grain::empty());
        }
        self.width = width;
        self.height = height;
        self.current = 0;

        let rows = ceiling_rows.min(height - 1);
        for x in 0..width {
            for y in 0..rows {
                self.set_both(x, y, Grain::solid());
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Buffer index of `(x, y)`.
    ///
    /// Row `height` folds onto the floor row, and any column past the right
    /// edge folds onto the rightmost column. The left edge is not handled
    /// here; the update rule treats `x < 1` as a wall itself.
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        x * self.height + y
    }

    /// Cell of the current (pre-tick) state.
    #[must_use]
    pub fn read(&self, x: usize, y: usize) -> &Grain {
        &self.buffers[self.current][self.index(x, y)]
    }

    /// Cell of the working state.
    #[must_use]
    pub fn working(&self, x: usize, y: usize) -> &Grain {
        &self.buffers[self.current ^ 1][self.index(x, y)]
    }

    #[must_use]
    pub fn occupied(&self, x: usize, y: usize) -> bool {
        self.read(x, y).is_occupied()
    }

    /// Exchange two cells of the working buffer.
    pub fn swap_working(&mut self, a: (usize, usize), b: (usize, usize)) {
        let ia = self.index(a.0, a.1);
        let ib = self.index(b.0, b.1);
        self.buffers[self.current ^ 1].swap(ia, ib);
    }

    /// Write straight into both buffers, bypassing the tick's roles.
    pub fn set_both(&mut self, x: usize, y: usize, grain: Grain) {
        let i = self.index(x, y);
        self.buffers[0][i] = grain;
        self.buffers[1][i] = grain;
    }

    /// Start a tick: the working buffer becomes a copy of current.
    pub fn begin_tick(&mut self) {
        let [first, second] = &mut self.buffers;
        if self.current == 0 {
            second.copy_from_slice(first);
        } else {
            first.copy_from_slice(second);
        }
    }

    /// Finish a tick: working becomes current.
    pub fn swap_roles(&mut self) {
        self.current ^= 1;
    }

    #[must_use]
    pub fn current_cells(&self) -> &[Grain] {
        &self.buffers[self.current]
    }

    #[must_use]
    pub fn working_cells(&self) -> &[Grain] {
        &self.buffers[self.current ^ 1]
    }

    #[must_use]
    pub fn count_occupied(&self) -> usize {
        self.current_cells()
            .iter()
            .filter(|grain| grain.is_occupied())
            .count()
    }
}
