//! Frozen result of a generation run, shared read-only with collaborators.

use xxhash_rust::xxh3::xxh3_64;

use crate::config::DungeonStrategy;
use crate::pathfinding;
use crate::types::{Coord, SpawnCategory, TileKind};

use super::classify::{EdgeClassification, WallSet};
use super::floor_set::FloorSet;
use super::grid::{Bounds, GridModel};
use super::spawns::SpawnPlacement;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedDungeon {
    strategy: DungeonStrategy,
    seed: u64,
    floors: FloorSet,
    walls: WallSet,
    edges: EdgeClassification,
    grid: GridModel,
    exit: Coord,
    spawns: Vec<SpawnPlacement>,
}

pub(super) struct DungeonParts {
    pub(super) strategy: DungeonStrategy,
    pub(super) seed: u64,
    pub(super) floors: FloorSet,
    pub(super) walls: WallSet,
    pub(super) edges: EdgeClassification,
    pub(super) grid: GridModel,
    pub(super) exit: Coord,
    pub(super) spawns: Vec<SpawnPlacement>,
}

impl GeneratedDungeon {
    pub(super) fn freeze(parts: DungeonParts) -> Self {
        let DungeonParts { strategy, seed, floors, walls, edges, grid, exit, spawns } = parts;
        Self { strategy, seed, floors, walls, edges, grid, exit, spawns }
    }

    pub fn strategy(&self) -> DungeonStrategy {
        self.strategy
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn floors(&self) -> &FloorSet {
        &self.floors
    }

    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn edges(&self) -> &EdgeClassification {
        &self.edges
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    pub fn spawns(&self) -> &[SpawnPlacement] {
        &self.spawns
    }

    pub fn spawns_of(&self, category: SpawnCategory) -> impl Iterator<Item = &SpawnPlacement> {
        self.spawns.iter().filter(move |spawn| spawn.category == category)
    }

    pub fn tile_at(&self, coord: Coord) -> TileKind {
        self.grid.tile_at(coord)
    }

    /// Walkability predicate handed to the pathfinder: floor tiles only.
    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.grid.is_floor(coord)
    }

    pub fn next_step(&self, agent: Coord, target: Coord) -> Coord {
        pathfinding::next_step(agent, target, |coord| self.is_walkable(coord))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.push(match self.strategy {
            DungeonStrategy::Caverns => 0,
            DungeonStrategy::Rooms => 1,
            DungeonStrategy::WindingHalls => 2,
        });
        bytes.extend(self.seed.to_le_bytes());

        bytes.extend((self.floors.len() as u32).to_le_bytes());
        for floor in self.floors.iter() {
            push_coord(&mut bytes, floor);
        }

        bytes.extend((self.edges.len() as u32).to_le_bytes());
        for (wall, mask) in self.edges.iter() {
            push_coord(&mut bytes, wall);
            bytes.push(mask.bits());
        }

        push_coord(&mut bytes, self.exit);

        bytes.extend((self.spawns.len() as u32).to_le_bytes());
        for spawn in &self.spawns {
            bytes.push(match spawn.category {
                SpawnCategory::Item => 0,
                SpawnCategory::Enemy => 1,
            });
            bytes.extend((spawn.catalog_index as u32).to_le_bytes());
            push_coord(&mut bytes, spawn.coord);
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Top row first. `.` floor, `#` wall, `>` exit, `!` item, `e` enemy.
    pub fn render_ascii(&self) -> String {
        let Some(bounds) = self.grid.bounds() else {
            return String::new();
        };
        let mut rows = Vec::with_capacity(bounds.height());
        for y in (bounds.min.y..=bounds.max.y).rev() {
            let row: String = (bounds.min.x..=bounds.max.x)
                .map(|x| self.glyph_at(Coord::new(x, y)))
                .collect();
            rows.push(row.trim_end().to_string());
        }
        rows.join("\n")
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.grid.bounds()
    }

    fn glyph_at(&self, coord: Coord) -> char {
        if coord == self.exit {
            return '>';
        }
        if let Some(spawn) = self.spawns.iter().find(|spawn| spawn.coord == coord) {
            return match spawn.category {
                SpawnCategory::Item => '!',
                SpawnCategory::Enemy => 'e',
            };
        }
        match self.grid.tile_at(coord) {
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::Unclaimed => ' ',
        }
    }
}

fn push_coord(bytes: &mut Vec<u8>, coord: Coord) {
    bytes.extend(coord.x.to_le_bytes());
    bytes.extend(coord.y.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use crate::config::{DungeonStrategy, GenerationConfig, WallFill};
    use crate::mapgen::generate_dungeon;
    use crate::types::{Coord, TileKind};

    fn single_tile(fill: WallFill) -> super::GeneratedDungeon {
        let config = GenerationConfig {
            wall_fill: fill,
            ..GenerationConfig::with_strategy(DungeonStrategy::Caverns, 1)
        };
        generate_dungeon(&config, 7).expect("a single tile never stalls")
    }

    #[test]
    fn single_tile_dungeon_renders_exit_inside_walls() {
        assert_eq!(single_tile(WallFill::Cardinal).render_ascii(), " #\n#>#\n #");
        assert_eq!(single_tile(WallFill::Surround).render_ascii(), "###\n#>#\n###");
    }

    #[test]
    fn tile_queries_answer_outside_the_map() {
        let dungeon = single_tile(WallFill::Cardinal);
        assert_eq!(dungeon.tile_at(Coord::ORIGIN), TileKind::Floor);
        assert_eq!(dungeon.tile_at(Coord::new(0, 1)), TileKind::Wall);
        assert_eq!(dungeon.tile_at(Coord::new(40, -40)), TileKind::Unclaimed);
        assert!(!dungeon.is_walkable(Coord::new(1, 0)));
    }

    #[test]
    fn canonical_bytes_have_a_fixed_layout() {
        let dungeon = single_tile(WallFill::Cardinal);
        let bytes = dungeon.canonical_bytes();
        // strategy, seed, 1 floor, 4 classified walls, exit, 0 spawns
        assert_eq!(bytes.len(), 1 + 8 + (4 + 8) + (4 + 4 * 9) + 8 + 4);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..9], &7_u64.to_le_bytes());
        assert_eq!(dungeon.fingerprint(), single_tile(WallFill::Cardinal).fingerprint());
    }

    #[test]
    fn next_step_from_exit_to_itself_stays_put() {
        let config = GenerationConfig::with_strategy(DungeonStrategy::Rooms, 120);
        let dungeon = generate_dungeon(&config, 31).expect("generation succeeds");
        assert_eq!(dungeon.next_step(dungeon.exit(), dungeon.exit()), dungeon.exit());
        let first = dungeon.floors().first().expect("non-empty");
        let step = dungeon.next_step(first, dungeon.exit());
        assert!(dungeon.is_walkable(step));
    }
}
