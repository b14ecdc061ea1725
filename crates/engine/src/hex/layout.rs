use crate::app::Vec2;

use super::coord::{FractionalHex, Hex};

const SQRT_3: f32 = 1.732_050_8;

// Pointy-top orientation. Forward maps axial to pixel, backward is its inverse.
const FORWARD: [f32; 4] = [SQRT_3, SQRT_3 / 2.0, 0.0, 3.0 / 2.0];
const BACKWARD: [f32; 4] = [SQRT_3 / 3.0, -1.0 / 3.0, 0.0, 2.0 / 3.0];

/// Corner angle offset, in multiples of 60°.
pub const START_ANGLE: f32 = 0.5;

/// Hex↔pixel transform.
///
/// `origin` is the pixel position of hex `(0, 0, 0)` and only moves through [`Layout::recenter`].
/// `size` is the per-axis hex radius in pixels; halving `size.y` gives the isometric look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    origin: Vec2,
    size: Vec2,
}

/// An origin move, used to carry already-known pixel positions across a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginShift {
    pub old: Vec2,
    pub new: Vec2,
}

impl OriginShift {
    /// Keeps `point`'s offset from the origin unchanged.
    pub fn rebase(&self, point: Vec2) -> Vec2 {
        Vec2 {
            x: self.new.x + (point.x - self.old.x),
            y: self.new.y + (point.y - self.old.y),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.old == self.new
    }
}

impl Layout {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn recenter(&mut self, new_origin: Vec2) -> OriginShift {
        let shift = OriginShift {
            old: self.origin,
            new: new_origin,
        };
        self.origin = new_origin;
        shift
    }

    pub fn hex_to_pixel(&self, hex: &Hex) -> Vec2 {
        let q = hex.q() as f32;
        let r = hex.r() as f32;
        let x = (FORWARD[0] * q + FORWARD[1] * r) * self.size.x;
        let y = (FORWARD[2] * q + FORWARD[3] * r) * self.size.y;
        Vec2 {
            x: x + self.origin.x,
            y: y + self.origin.y,
        }
    }

    pub fn pixel_to_fractional(&self, point: Vec2) -> FractionalHex {
        let px = (point.x - self.origin.x) / self.size.x;
        let py = (point.y - self.origin.y) / self.size.y;
        let q = BACKWARD[0] * px + BACKWARD[1] * py;
        let r = BACKWARD[2] * px + BACKWARD[3] * py;
        FractionalHex { q, r, s: -q - r }
    }

    pub fn pixel_to_hex(&self, point: Vec2) -> Hex {
        self.pixel_to_fractional(point).round()
    }

    /// Corner `i` sits at `60° * (i - START_ANGLE)`. Corners 1..=3 form the lower edge, which the
    /// renderer extrudes into the depth skirt.
    pub fn corners(&self, hex: &Hex) -> [Vec2; 6] {
        let center = self.hex_to_pixel(hex);
        std::array::from_fn(|i| {
            let angle = (60.0 * (i as f32 - START_ANGLE)).to_radians();
            Vec2 {
                x: center.x + self.size.x * angle.cos(),
                y: center.y + self.size.y * angle.sin(),
            }
        })
    }
}
