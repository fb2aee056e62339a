//! Wall derivation and 4-bit edge classification of wall tiles.
//!
//! Classification is two-phase: the wall set is derived from a finished floor
//! set, and edge masks can only be computed from a finished [`WallSet`].

use std::collections::{BTreeMap, BTreeSet};

use crate::config::WallFill;
use crate::types::Coord;

use super::floor_set::FloorSet;

/// Number of rounded-edge visuals the renderer supplies, one per non-zero mask.
pub const EDGE_VARIANT_COUNT: usize = 15;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WallSet {
    cells: BTreeSet<Coord>,
}

impl WallSet {
    pub fn derive(floors: &FloorSet, fill: WallFill) -> Self {
        let mut cells = BTreeSet::new();
        for floor in floors.iter() {
            for candidate in surrounding(floor, fill) {
                if !floors.contains(candidate) {
                    cells.insert(candidate);
                }
            }
        }
        Self { cells }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Walls in ascending `(x, y)` order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }
}

impl FromIterator<Coord> for WallSet {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        Self { cells: iter.into_iter().collect() }
    }
}

fn surrounding(center: Coord, fill: WallFill) -> Vec<Coord> {
    match fill {
        WallFill::Cardinal => center.neighbors().to_vec(),
        WallFill::Surround => (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(|(dx, dy)| center.offset(dx, dy))
            .collect(),
    }
}

/// Which cardinal neighbors of a wall tile are open (not walls).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeMask(u8);

impl EdgeMask {
    pub const TOP: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const BOTTOM: u8 = 4;
    pub const LEFT: u8 = 8;

    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits <= 15).then_some(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_enclosed(self) -> bool {
        self.0 == 0
    }

    pub fn is_open(self, side: u8) -> bool {
        self.0 & side != 0
    }

    /// Index into the renderer's rounded-edge catalog; `None` for a plain wall.
    pub fn variant_index(self) -> Option<usize> {
        (self.0 > 0).then(|| usize::from(self.0) - 1)
    }
}

pub fn edge_mask(wall: Coord, walls: &WallSet) -> EdgeMask {
    let [top, right, bottom, left] = wall.neighbors();
    let mut bits = 0;
    if !walls.contains(top) {
        bits |= EdgeMask::TOP;
    }
    if !walls.contains(right) {
        bits |= EdgeMask::RIGHT;
    }
    if !walls.contains(bottom) {
        bits |= EdgeMask::BOTTOM;
    }
    if !walls.contains(left) {
        bits |= EdgeMask::LEFT;
    }
    EdgeMask(bits)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeClassification {
    masks: BTreeMap<Coord, EdgeMask>,
}

impl EdgeClassification {
    pub fn from_walls(walls: &WallSet) -> Self {
        Self { masks: walls.iter().map(|wall| (wall, edge_mask(wall, walls))).collect() }
    }

    pub fn get(&self, coord: Coord) -> Option<EdgeMask> {
        self.masks.get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, EdgeMask)> + '_ {
        self.masks.iter().map(|(coord, mask)| (*coord, *mask))
    }

    /// Walls that receive a rounded-edge ornament, with the catalog index.
    pub fn ornaments(&self) -> impl Iterator<Item = (Coord, usize)> + '_ {
        self.iter().filter_map(|(coord, mask)| mask.variant_index().map(|index| (coord, index)))
    }
}

pub fn classify(floors: &FloorSet, fill: WallFill) -> (WallSet, EdgeClassification) {
    let walls = WallSet::derive(floors, fill);
    let edges = EdgeClassification::from_walls(&walls);
    (walls, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floors(cells: &[(i32, i32)]) -> FloorSet {
        cells.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    fn walls(cells: &[(i32, i32)]) -> WallSet {
        cells.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn single_floor_tile_gets_four_cardinal_walls() {
        let (walls, edges) = classify(&floors(&[(0, 0)]), WallFill::Cardinal);
        let expected: Vec<Coord> =
            vec![Coord::new(-1, 0), Coord::new(0, -1), Coord::new(0, 1), Coord::new(1, 0)];
        assert_eq!(walls.iter().collect::<Vec<_>>(), expected);
        assert_eq!(edges.len(), 4);
        for (_, mask) in edges.iter() {
            assert_eq!(mask.bits(), 15, "isolated walls are open on every side");
        }
    }

    #[test]
    fn surround_fill_adds_diagonal_corners() {
        let walls = WallSet::derive(&floors(&[(0, 0)]), WallFill::Surround);
        assert_eq!(walls.len(), 8);
        assert!(walls.contains(Coord::new(1, 1)));
        assert!(walls.contains(Coord::new(-1, -1)));
        assert!(!walls.contains(Coord::new(0, 0)));
    }

    #[test]
    fn surround_fill_encloses_a_wall_between_diagonal_floors() {
        let (walls, edges) = classify(&floors(&[(1, 1), (-1, -1)]), WallFill::Surround);
        assert!(walls.contains(Coord::ORIGIN));
        assert_eq!(edges.get(Coord::ORIGIN).map(EdgeMask::bits), Some(0));
    }

    #[test]
    fn walls_never_overlap_floors_and_touch_a_floor() {
        let floor_set = floors(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
        let walls = WallSet::derive(&floor_set, WallFill::Cardinal);
        for wall in walls.iter() {
            assert!(!floor_set.contains(wall));
            assert!(wall.neighbors().iter().any(|next| floor_set.contains(*next)));
        }
    }

    #[test]
    fn open_top_and_right_wall_selects_variant_two() {
        let wall_set = walls(&[(0, 0), (0, -1), (-1, 0)]);
        let mask = edge_mask(Coord::new(0, 0), &wall_set);

        assert_eq!(mask.bits(), EdgeMask::TOP | EdgeMask::RIGHT);
        assert_eq!(mask.bits(), 3);
        assert_eq!(mask.variant_index(), Some(2));
    }

    #[test]
    fn fully_enclosed_wall_has_no_ornament() {
        let block: Vec<(i32, i32)> =
            (-1..=1).flat_map(|x| (-1..=1).map(move |y| (x, y))).collect();
        let wall_set = walls(&block);
        let edges = EdgeClassification::from_walls(&wall_set);

        let center = edges.get(Coord::new(0, 0)).expect("center is a wall");
        assert!(center.is_enclosed());
        assert_eq!(center.variant_index(), None);
        assert!(edges.ornaments().all(|(coord, _)| coord != Coord::new(0, 0)));
    }

    #[test]
    fn bits_follow_top_right_bottom_left() {
        let wall_set = walls(&[(0, 0), (0, 1), (1, 0), (-1, 0)]);
        let mask = edge_mask(Coord::new(0, 0), &wall_set);
        assert_eq!(mask.bits(), EdgeMask::BOTTOM);
        assert!(mask.is_open(EdgeMask::BOTTOM));
        assert!(!mask.is_open(EdgeMask::TOP));
        assert_eq!(mask.variant_index(), Some(3));
    }

    #[test]
    fn variant_indices_cover_the_catalog() {
        let indices: Vec<usize> = (1..=15)
            .map(|bits| EdgeMask::from_bits(bits).and_then(EdgeMask::variant_index))
            .map(|index| index.expect("non-zero masks have a variant"))
            .collect();
        assert_eq!(indices, (0..EDGE_VARIANT_COUNT).collect::<Vec<_>>());
        assert_eq!(EdgeMask::from_bits(16), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let floor_set = floors(&[(0, 0), (0, 1), (1, 1), (1, 2), (3, 3)]);
        let first = classify(&floor_set, WallFill::Cardinal);
        let second = classify(&floor_set, WallFill::Cardinal);
        assert_eq!(first, second);
    }
}
