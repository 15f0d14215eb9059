//! Published snapshot of a completed tick.

use crate::grain::Grain;

/// Copy of the grid as of the end of tick `tick`. Grains are column-major
/// (`x * height + y`), like the engine's own buffers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub tick: u64,
    pub grains: Vec<Grain>,
}

impl Frame {
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&Grain> {
        if x < self.width && y < self.height {
            self.grains.get(x * self.height + y)
        } else {
            None
        }
    }

    #[must_use]
    pub fn count_occupied(&self) -> usize {
        self.grains.iter().filter(|grain| grain.is_occupied()).count()
    }

    /// Overwrite `self` with `grains`, reusing the allocation.
    pub(crate) fn copy_from(&mut self, width: usize, height: usize, tick: u64, grains: &[Grain]) {
        self.width = width;
        self.height = height;
        self.tick = tick;
        self.grains.clear();
        self.grains.extend_from_slice(grains);
    }

    /// Fill `out` with row-major RGBA8 pixels (`(y * width + x) * 4`).
    pub fn write_rgba(&self, out: &mut Vec<u8>) {
        out.clear();
        out.resize(self.width * self.height * 4, 0);
        for (i, grain) in self.grains.iter().enumerate() {
            let x = i / self.height;
            let y = i % self.height;
            let offset = (y * self.width + x) * 4;
            out[offset..offset + 4].copy_from_slice(&grain.to_rgba());
        }
    }

    #[must_use]
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_rgba(&mut out);
        out
    }
}
