//! Exit selection and item/enemy spawn eligibility and rolls.

use serde::Serialize;

use crate::config::GenerationConfig;
use crate::types::{Coord, SpawnCategory};

use super::classify::{EdgeClassification, WallSet};
use super::floor_set::FloorSet;
use super::grid::Bounds;
use super::seed::DungeonRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SpawnPlacement {
    pub coord: Coord,
    pub catalog_index: usize,
    pub category: SpawnCategory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Population {
    pub exit: Coord,
    pub placements: Vec<SpawnPlacement>,
}

/// Which cardinal neighbors of a floor tile are walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WallSides {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

impl WallSides {
    fn around(coord: Coord, walls: &WallSet) -> Self {
        let [top, right, bottom, left] = coord.neighbors().map(|next| walls.contains(next));
        Self { top, right, bottom, left }
    }

    fn any(self) -> bool {
        self.top || self.right || self.bottom || self.left
    }

    /// Walled on both verticals or both horizontals: a straight corridor cell.
    fn is_corridor(self) -> bool {
        (self.top && self.bottom) || (self.right && self.left)
    }
}

pub(super) fn eligible_for(
    category: SpawnCategory,
    coord: Coord,
    walls: &WallSet,
    exit: Coord,
) -> bool {
    if coord == exit {
        return false;
    }
    let sides = WallSides::around(coord, walls);
    match category {
        SpawnCategory::Item => sides.any() && !sides.is_corridor(),
        SpawnCategory::Enemy => !sides.any(),
    }
}

/// Picks the exit and rolls spawns over every floor tile in the floor set's
/// bounding box expanded by one cell, scanning column by column.
///
/// Returns `None` only for an empty floor set.
pub fn plan(
    floors: &FloorSet,
    walls: &WallSet,
    edges: &EdgeClassification,
    config: &GenerationConfig,
    rng: &mut DungeonRng,
) -> Option<Population> {
    debug_assert_eq!(edges.len(), walls.len(), "edges must be classified from the final wall set");
    let exit = floors.last()?;
    let scan = Bounds::around(floors.iter())?.expanded(1);

    let mut placements = Vec::new();
    for coord in scan.columns() {
        if !floors.contains(coord) {
            continue;
        }
        for category in [SpawnCategory::Item, SpawnCategory::Enemy] {
            if !eligible_for(category, coord, walls, exit) {
                continue;
            }
            if let Some(catalog_index) = roll_spawn(config, category, rng) {
                placements.push(SpawnPlacement { coord, catalog_index, category });
            }
        }
    }

    tracing::debug!(
        exit_x = exit.x,
        exit_y = exit.y,
        items = placements.iter().filter(|spawn| spawn.category == SpawnCategory::Item).count(),
        enemies = placements.iter().filter(|spawn| spawn.category == SpawnCategory::Enemy).count(),
        "population planned"
    );
    Some(Population { exit, placements })
}

fn roll_spawn(
    config: &GenerationConfig,
    category: SpawnCategory,
    rng: &mut DungeonRng,
) -> Option<usize> {
    let percent = config.spawn_percent(category);
    let catalog = config.catalog(category);
    if percent == 0 || catalog.is_empty() {
        return None;
    }
    if rng.percentile() > percent {
        return None;
    }
    Some(rng.index(catalog.len()))
}
