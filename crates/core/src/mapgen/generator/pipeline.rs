//! The two generation phases and the token that joins them.

use crate::config::{DungeonStrategy, GenerationConfig};
use crate::error::DungeonError;

use super::super::classify::{EdgeClassification, WallSet};
use super::super::floor_set::FloorSet;
use super::super::grid::GridModel;
use super::super::model::{DungeonParts, GeneratedDungeon};
use super::super::seed::{DungeonRng, POPULATION_STREAM, WALK_STREAM};
use super::super::sink::{MaterializedSummary, TileSink};
use super::super::spawns::plan;

/// Proof that phase one ran to completion. Only [`materialize`] builds it and
/// only [`populate`] consumes it, so population can never observe a
/// partially built wall set.
pub(super) struct Materialized {
    strategy: DungeonStrategy,
    seed: u64,
    floors: FloorSet,
    walls: WallSet,
    grid: GridModel,
}

pub(super) fn materialize(
    config: &GenerationConfig,
    seed: u64,
    sink: &mut dyn TileSink,
) -> Result<Materialized, DungeonError> {
    let strategy = config.strategy;
    let mut rng = DungeonRng::for_stream(seed, WALK_STREAM);
    let floors = strategy.walker().generate(config, &mut rng)?;
    let walls = WallSet::derive(&floors, config.wall_fill);

    for floor in floors.iter() {
        sink.floor_tile(floor);
    }
    for wall in walls.iter() {
        sink.wall_tile(wall);
    }

    let grid = GridModel::from_sets(&floors, &walls);
    let summary = MaterializedSummary { floor_count: floors.len(), wall_count: walls.len() };
    tracing::debug!(
        %strategy,
        seed,
        floor_count = summary.floor_count,
        wall_count = summary.wall_count,
        "phase one materialized"
    );
    sink.materialized(summary);

    Ok(Materialized { strategy, seed, floors, walls, grid })
}

pub(super) fn populate(
    materialized: Materialized,
    config: &GenerationConfig,
    sink: &mut dyn TileSink,
) -> Result<GeneratedDungeon, DungeonError> {
    let Materialized { strategy, seed, floors, walls, grid } = materialized;

    let edges = EdgeClassification::from_walls(&walls);
    for (wall, variant) in edges.ornaments() {
        sink.edge_ornament(wall, variant);
    }

    let mut rng = DungeonRng::for_stream(seed, POPULATION_STREAM);
    let population = plan(&floors, &walls, &edges, config, &mut rng)
        .ok_or(DungeonError::EmptyFloorSet { strategy })?;

    sink.exit(population.exit);
    for placement in &population.placements {
        sink.spawn(placement);
    }

    Ok(GeneratedDungeon::freeze(DungeonParts {
        strategy,
        seed,
        floors,
        walls,
        edges,
        grid,
        exit: population.exit,
        spawns: population.placements,
    }))
}
