use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

pub const DEFAULT_FILL_COLOR: [u8; 4] = [0x1a, 0x1b, 0x1b, 0xff];
pub const DEFAULT_STROKE_COLOR: [u8; 4] = [0x0a, 0x0a, 0x0a, 0xff];

/// Axial deltas in canonical neighbour order. Path search explores neighbours in this order,
/// which is what makes tie-broken shortest paths reproducible.
pub const HEX_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HexError {
    #[error("cube coordinates must sum to zero, got q={q} r={r} s={s}")]
    InvalidCoordinate { q: f32, r: f32, s: f32 },
    #[error("hexagon radius {radius} exceeds the maximum of {max}")]
    RadiusTooLarge { radius: u32, max: u32 },
}

/// Presentation-only attributes. Never part of a hex's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexStyle {
    pub fill: [u8; 4],
    pub stroke: [u8; 4],
}

impl Default for HexStyle {
    fn default() -> Self {
        Self {
            fill: DEFAULT_FILL_COLOR,
            stroke: DEFAULT_STROKE_COLOR,
        }
    }
}

/// Grid key derived from `(q, r)` alone; `s` is redundant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexKey {
    pub q: i32,
    pub r: i32,
}

impl HexKey {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

impl fmt::Display for HexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.q, self.r)
    }
}

/// Cube-coordinate hex. Equality and hashing only look at `(q, r)`.
#[derive(Debug, Clone, Copy)]
pub struct Hex {
    q: i32,
    r: i32,
    s: i32,
    style: HexStyle,
}

impl Hex {
    pub fn new(q: i32, r: i32, s: i32) -> Result<Self, HexError> {
        let sum = i64::from(q) + i64::from(r) + i64::from(s);
        if sum != 0 {
            return Err(HexError::InvalidCoordinate {
                q: q as f32,
                r: r as f32,
                s: s as f32,
            });
        }
        Ok(Self {
            q,
            r,
            s,
            style: HexStyle::default(),
        })
    }

    pub const fn axial(q: i32, r: i32) -> Self {
        Self {
            q,
            r,
            s: -q - r,
            style: HexStyle {
                fill: DEFAULT_FILL_COLOR,
                stroke: DEFAULT_STROKE_COLOR,
            },
        }
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn s(&self) -> i32 {
        self.s
    }

    pub fn style(&self) -> HexStyle {
        self.style
    }

    pub fn key(&self) -> HexKey {
        HexKey::new(self.q, self.r)
    }

    pub fn with_style(mut self, style: HexStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_fill(mut self, fill: [u8; 4]) -> Self {
        self.style.fill = fill;
        self
    }

    pub fn distance(&self, other: &Hex) -> u32 {
        self.q
            .abs_diff(other.q)
            .max(self.r.abs_diff(other.r))
            .max(self.s.abs_diff(other.s))
    }

    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dq, dr) = HEX_DIRECTIONS[direction % HEX_DIRECTIONS.len()];
        Hex::axial(self.q + dq, self.r + dr)
    }

    pub fn neighbors(&self) -> [Hex; 6] {
        std::array::from_fn(|direction| self.neighbor(direction))
    }
}

impl From<HexKey> for Hex {
    fn from(key: HexKey) -> Self {
        Hex::axial(key.q, key.r)
    }
}

impl PartialEq for Hex {
    fn eq(&self, other: &Self) -> bool {
        self.q == other.q && self.r == other.r
    }
}

impl Eq for Hex {}

impl Hash for Hex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Non-integer cube coordinates, as produced by the inverse layout transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalHex {
    pub q: f32,
    pub r: f32,
    pub s: f32,
}

impl FractionalHex {
    pub fn new(q: f32, r: f32, s: f32) -> Result<Self, HexError> {
        if round_half_up(q + r + s) != 0.0 {
            return Err(HexError::InvalidCoordinate { q, r, s });
        }
        Ok(Self { q, r, s })
    }

    /// Rounds every axis, then rebuilds the axis with the largest rounding error from the other
    /// two. Ties resolve q before r before s; boundary pixels depend on that order.
    pub fn round(&self) -> Hex {
        let mut q = round_half_up(self.q);
        let mut r = round_half_up(self.r);
        let mut s = round_half_up(self.s);

        let q_diff = (q - self.q).abs();
        let r_diff = (r - self.r).abs();
        let s_diff = (s - self.s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r - s;
        } else if r_diff > s_diff {
            r = -q - s;
        } else {
            s = -q - r;
        }

        debug_assert!(q + r + s == 0.0);
        Hex::axial(q as i32, r as i32)
    }
}

// Halves round toward positive infinity, so -0.5 becomes 0 rather than -1.
fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn zero_sum_coordinates_construct() {
        for q in -6..=6 {
            for r in -6..=6 {
                let hex = Hex::new(q, r, -q - r).expect("zero-sum hex");
                assert_eq!((hex.q(), hex.r(), hex.s()), (q, r, -q - r));
            }
        }
    }

    #[test]
    fn non_zero_sum_is_rejected() {
        for q in -6..=6 {
            for r in -6..=6 {
                let err = Hex::new(q, r, -q - r + 1).expect_err("sum of one");
                assert!(matches!(err, HexError::InvalidCoordinate { .. }));
            }
        }
    }

    #[test]
    fn extreme_coordinates_do_not_overflow_the_sum_check() {
        assert!(Hex::new(i32::MAX, i32::MAX, 0).is_err());
    }

    #[test]
    fn equality_and_key_ignore_style() {
        let plain = Hex::axial(2, -1);
        let painted = Hex::axial(2, -1).with_fill([1, 2, 3, 255]);
        assert_eq!(plain, painted);
        assert_eq!(plain.key(), painted.key());

        let mut set = HashSet::new();
        set.insert(plain);
        assert!(set.contains(&painted));
        assert_eq!(plain.key().to_string(), "2_-1");
    }

    #[test]
    fn distance_is_max_axis_delta() {
        let origin = Hex::axial(0, 0);
        assert_eq!(origin.distance(&origin), 0);
        assert_eq!(origin.distance(&Hex::axial(1, 0)), 1);
        assert_eq!(origin.distance(&Hex::axial(3, -1)), 3);
        assert_eq!(Hex::axial(-2, 2).distance(&Hex::axial(2, -1)), 4);
    }

    #[test]
    fn neighbors_follow_canonical_order_and_are_adjacent() {
        let center = Hex::axial(1, 1);
        let neighbors = center.neighbors();
        assert_eq!(neighbors[0], Hex::axial(2, 1));
        assert_eq!(neighbors[5], Hex::axial(1, 2));
        for neighbor in neighbors {
            assert_eq!(center.distance(&neighbor), 1);
        }
    }

    #[test]
    fn fractional_constructor_checks_rounded_sum() {
        assert!(FractionalHex::new(0.4, 0.3, -0.7).is_ok());
        assert!(FractionalHex::new(0.4, 0.3, 0.7).is_err());
    }

    #[test]
    fn rounding_corrects_q_when_q_error_is_strictly_largest() {
        // q error 0.4, r and s errors tie at 0.3.
        let hex = FractionalHex::new(0.4, 0.3, -0.7).expect("valid").round();
        assert_eq!(hex, Hex::axial(1, 0));
    }

    #[test]
    fn rounding_prefers_r_over_s_when_q_and_r_tie() {
        // q and r errors tie at 0.5, s is exact; the q branch needs a strict win, r beats s.
        let hex = FractionalHex::new(0.5, 0.5, -1.0).expect("valid").round();
        assert_eq!((hex.q(), hex.r(), hex.s()), (1, 0, -1));
    }

    #[test]
    fn rounding_falls_through_to_s_when_q_and_s_tie() {
        // q and s errors tie at 0.5, r is exact; neither q nor r wins, so s is rebuilt.
        let hex = FractionalHex::new(0.5, -1.0, 0.5).expect("valid").round();
        assert_eq!((hex.q(), hex.r(), hex.s()), (1, -1, 0));
    }

    #[test]
    fn rounding_result_always_sums_to_zero() {
        let samples = [
            (0.1, 0.2),
            (-0.5, 0.5),
            (1.49, -0.51),
            (-2.7, 1.2),
            (3.5, -3.5),
        ];
        for (q, r) in samples {
            let hex = FractionalHex::new(q, r, -q - r).expect("valid").round();
            assert_eq!(hex.q() + hex.r() + hex.s(), 0);
        }
    }
}
