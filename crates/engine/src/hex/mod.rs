//! Hex-grid geometry: cube coordinates, the pixel layout transform and the walkable grid.

mod coord;
mod grid;
mod layout;

pub use coord::{
    FractionalHex, Hex, HexError, HexKey, HexStyle, DEFAULT_FILL_COLOR, DEFAULT_STROKE_COLOR,
    HEX_DIRECTIONS,
};
pub use grid::{HexGrid, MAX_HEXAGON_RADIUS};
pub use layout::{Layout, OriginShift, START_ANGLE};
