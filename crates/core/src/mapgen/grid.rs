//! Coordinate-to-tile lookup over the unbounded lattice.

use std::collections::BTreeMap;

use crate::types::{Coord, TileKind};

use super::classify::WallSet;
use super::floor_set::FloorSet;

/// Inclusive bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Bounds {
    pub fn around(mut coords: impl Iterator<Item = Coord>) -> Option<Self> {
        let first = coords.next()?;
        let mut bounds = Self { min: first, max: first };
        for coord in coords {
            bounds.min.x = bounds.min.x.min(coord.x);
            bounds.min.y = bounds.min.y.min(coord.y);
            bounds.max.x = bounds.max.x.max(coord.x);
            bounds.max.y = bounds.max.y.max(coord.y);
        }
        Some(bounds)
    }

    pub fn expanded(self, margin: i32) -> Self {
        Self { min: self.min.offset(-margin, -margin), max: self.max.offset(margin, margin) }
    }

    pub fn contains(self, coord: Coord) -> bool {
        (self.min.x..=self.max.x).contains(&coord.x) && (self.min.y..=self.max.y).contains(&coord.y)
    }

    pub fn width(self) -> usize {
        self.min.x.abs_diff(self.max.x) as usize + 1
    }

    pub fn height(self) -> usize {
        self.min.y.abs_diff(self.max.y) as usize + 1
    }

    /// Column-major scan: ascending `x`, and ascending `y` within a column.
    pub fn columns(self) -> impl Iterator<Item = Coord> {
        (self.min.x..=self.max.x)
            .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| Coord::new(x, y)))
    }
}

/// Authoritative tile kind per coordinate; anything not recorded is
/// [`TileKind::Unclaimed`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridModel {
    tiles: BTreeMap<Coord, TileKind>,
    bounds: Option<Bounds>,
}

impl GridModel {
    pub fn from_sets(floors: &FloorSet, walls: &WallSet) -> Self {
        let mut tiles = BTreeMap::new();
        for wall in walls.iter() {
            tiles.insert(wall, TileKind::Wall);
        }
        for floor in floors.iter() {
            tiles.insert(floor, TileKind::Floor);
        }
        let bounds = Bounds::around(tiles.keys().copied());
        Self { tiles, bounds }
    }

    pub fn tile_at(&self, coord: Coord) -> TileKind {
        self.tiles.get(&coord).copied().unwrap_or(TileKind::Unclaimed)
    }

    pub fn is_floor(&self, coord: Coord) -> bool {
        self.tile_at(coord) == TileKind::Floor
    }

    pub fn is_wall(&self, coord: Coord) -> bool {
        self.tile_at(coord) == TileKind::Wall
    }

    /// Bounds over every claimed tile, walls included.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
