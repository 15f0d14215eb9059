//! Sand update rule: fall straight down, otherwise slide to a free diagonal.

use rand::Rng;

use crate::api::Neighborhood;

/// Where a grain goes this tick, relative to its own cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Move {
    Stay,
    Down,
    DownLeft,
    DownRight,
}

impl Move {
    /// Destination cell, or `None` for [`Move::Stay`].
    #[must_use]
    pub fn target(self, x: usize, y: usize) -> Option<(usize, usize)> {
        match self {
            Self::Stay => None,
            Self::Down => Some((x, y + 1)),
            Self::DownLeft => Some((x.saturating_sub(1), y + 1)),
            Self::DownRight => Some((x + 1, y + 1)),
        }
    }
}

/// Decide the move of the occupied grain at the center of `cell`.
///
/// Only the symmetric case (both sides and both diagonals free) consumes
/// randomness: one fair coin.
pub fn resolve_grain<R: Rng + ?Sized>(cell: &Neighborhood<'_>, rng: &mut R) -> Move {
    if cell.on_floor() {
        return Move::Stay;
    }
    if !cell.below() {
        return Move::Down;
    }

    let left = cell.left();
    let right = cell.right();
    if left && right {
        return Move::Stay;
    }

    let down_left = cell.down_left();
    let down_right = cell.down_right();
    match (down_left, down_right) {
        (false, false) => {
            if !left && !right {
                if rng.gen_bool(0.5) {
                    Move::DownLeft
                } else {
                    Move::DownRight
                }
            } else if left {
                Move::DownRight
            } else {
                Move::DownLeft
            }
        }
        (false, true) if !left => Move::DownLeft,
        (true, false) if !right => Move::DownRight,
        _ => Move::Stay,
    }
}
