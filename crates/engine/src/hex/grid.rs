use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use super::coord::{Hex, HexError, HexKey, HexStyle, HEX_DIRECTIONS};

/// Largest radius `HexGrid::hexagon` accepts: 197_377 cells.
pub const MAX_HEXAGON_RADIUS: u32 = 256;

/// The set of walkable cells. Every stored key equals its value's `key()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HexGrid {
    cells: HashMap<HexKey, Hex>,
}

impl HexGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hexagon-shaped board of every cell within `radius` steps of the origin.
    pub fn hexagon(radius: u32) -> Result<Self, HexError> {
        if radius > MAX_HEXAGON_RADIUS {
            return Err(HexError::RadiusTooLarge {
                radius,
                max: MAX_HEXAGON_RADIUS,
            });
        }
        let origin = Hex::axial(0, 0);
        let n = radius as i32;
        let mut grid = Self::new();
        for q in -n..=n {
            for r in (-n).max(-q - n)..=n.min(-q + n) {
                let hex = Hex::axial(q, r);
                debug_assert!(hex.distance(&origin) <= radius);
                grid.insert(hex);
            }
        }
        Ok(grid)
    }

    pub fn from_hexes(hexes: impl IntoIterator<Item = Hex>) -> Self {
        let mut grid = Self::new();
        for hex in hexes {
            grid.insert(hex);
        }
        grid
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, key: HexKey) -> bool {
        self.cells.contains_key(&key)
    }

    pub fn contains_hex(&self, hex: &Hex) -> bool {
        self.contains(hex.key())
    }

    pub fn get(&self, key: HexKey) -> Option<&Hex> {
        self.cells.get(&key)
    }

    /// Replaces any cell with the same key and returns the previous value.
    pub fn insert(&mut self, hex: Hex) -> Option<Hex> {
        self.cells.insert(hex.key(), hex)
    }

    pub fn remove(&mut self, key: HexKey) -> Option<Hex> {
        self.cells.remove(&key)
    }

    /// Stores a restyled copy of the cell. Returns false when `key` is not a member.
    pub fn restyle(&mut self, key: HexKey, style: HexStyle) -> bool {
        match self.cells.entry(key) {
            Entry::Occupied(mut entry) => {
                let restyled = entry.get().with_style(style);
                entry.insert(restyled);
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hex> {
        self.cells.values()
    }

    /// Cells sorted back to front (`r`, then `q`) so overlapping geometry paints in a stable order.
    pub fn iter_draw_order(&self) -> impl Iterator<Item = &Hex> {
        let mut cells: Vec<&Hex> = self.cells.values().collect();
        cells.sort_by_key(|hex| (hex.r(), hex.q()));
        cells.into_iter()
    }

    /// Shortest path in hop count from `start` to `goal` over member cells.
    ///
    /// The result excludes `start` and ends with `goal`. It is empty when the endpoints are equal,
    /// when either endpoint is not a member, or when `goal` cannot be reached. Neighbours are explored in
    /// [`HEX_DIRECTIONS`] order and the first discovery wins, so equal-length alternatives
    /// always resolve the same way.
    pub fn search_path(&self, start: &Hex, goal: &Hex) -> Vec<Hex> {
        let start_key = start.key();
        let goal_key = goal.key();
        if start_key == goal_key || !self.contains(start_key) || !self.contains(goal_key) {
            return Vec::new();
        }

        let mut came_from: HashMap<HexKey, HexKey> = HashMap::new();
        let mut frontier = VecDeque::new();
        frontier.push_back(start_key);
        came_from.insert(start_key, start_key);

        while let Some(current) = frontier.pop_front() {
            if current == goal_key {
                return self.reconstruct_path(&came_from, start_key, goal_key);
            }
            for (dq, dr) in HEX_DIRECTIONS {
                let next = HexKey::new(current.q + dq, current.r + dr);
                if !self.contains(next) {
                    continue;
                }
                if let Entry::Vacant(entry) = came_from.entry(next) {
                    entry.insert(current);
                    frontier.push_back(next);
                }
            }
        }

        Vec::new()
    }

    fn reconstruct_path(
        &self,
        came_from: &HashMap<HexKey, HexKey>,
        start: HexKey,
        goal: HexKey,
    ) -> Vec<Hex> {
        let mut keys = Vec::new();
        let mut cursor = goal;
        while cursor != start {
            keys.push(cursor);
            let Some(previous) = came_from.get(&cursor) else {
                return Vec::new();
            };
            cursor = *previous;
        }
        keys.reverse();
        keys.into_iter()
            .filter_map(|key| self.cells.get(&key).copied())
            .collect()
    }
}
