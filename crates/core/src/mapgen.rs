//! Procedural dungeon generation split into coherent submodules.

pub mod model;

mod classify;
mod floor_set;
mod generator;
mod grid;
mod seed;
mod sink;
mod spawns;
mod walker;

pub use classify::{EDGE_VARIANT_COUNT, EdgeClassification, EdgeMask, WallSet, classify, edge_mask};
pub use floor_set::FloorSet;
pub use generator::DungeonGenerator;
pub use grid::{Bounds, GridModel};
pub use model::GeneratedDungeon;
pub use seed::{AGENT_STREAM_BASE, DungeonRng, POPULATION_STREAM, WALK_STREAM, mix_seed_stream};
pub use sink::{MaterializedSummary, NullSink, TileSink};
pub use spawns::{Population, SpawnPlacement, plan};
pub use walker::{CavernWalker, RoomWalker, WalkStrategy, WindingWalker};

use crate::config::GenerationConfig;
use crate::error::DungeonError;

pub fn generate_dungeon(
    config: &GenerationConfig,
    seed: u64,
) -> Result<GeneratedDungeon, DungeonError> {
    DungeonGenerator::new(config.clone(), seed)?.generate()
}
