//! Grain and color types for the simulation grid.

use std::fmt;

/// 8-bit RGB color carried by a grain for rendering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue in degrees, saturation and value in `[0, 1]`.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Hsv {
    #[must_use]
    pub const fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Six-sector HSV to RGB conversion. Channels are truncated, not rounded.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let v = self.value;
        let s = self.saturation;
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let sector = h.floor();
        let ff = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * ff);
        let t = v * (1.0 - s * (1.0 - ff));

        // `rem_euclid` can round a tiny negative hue up to exactly 360.
        let (r, g, b) = match (sector as u8) % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

fn channel(component: f64) -> u8 {
    // `as` saturates, so components slightly outside [0, 1] clamp to 0/255.
    (255.0 * component) as u8
}

/// One grid cell: occupancy plus the color it renders with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Grain {
    occupied: bool,
    pub color: Rgb,
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.occupied { "#" } else { "." })
    }
}

impl Grain {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            occupied: false,
            color: Rgb::BLACK,
        }
    }

    /// Occupied and uncolored. Used for the initial ceiling.
    #[must_use]
    pub const fn solid() -> Self {
        Self {
            occupied: true,
            color: Rgb::BLACK,
        }
    }

    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            occupied: true,
            color: Rgb::new(r, g, b),
        }
    }

    #[must_use]
    pub fn from_hsv(hsv: Hsv) -> Self {
        Self {
            occupied: true,
            color: hsv.to_rgb(),
        }
    }

    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Occupied grains render in their own color; empty cells are opaque black.
    #[must_use]
    pub const fn to_rgba(&self) -> [u8; 4] {
        if self.occupied {
            [self.color.r, self.color.g, self.color.b, 255]
        } else {
            [0, 0, 0, 255]
        }
    }
}
