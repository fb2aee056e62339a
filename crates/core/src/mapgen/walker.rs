//! Floor-set generation: the three walk strategies behind one trait.

use crate::config::{DungeonStrategy, GenerationConfig, MAX_ROOM_HALF_EXTENT};
use crate::error::{ConfigError, DungeonError};
use crate::types::{Coord, Direction};

use super::floor_set::FloorSet;
use super::seed::DungeonRng;

/// A procedural walk that grows a floor set from the origin until it holds at
/// least `config.target_floor_count` tiles.
pub trait WalkStrategy: Sync {
    fn strategy(&self) -> DungeonStrategy;

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut DungeonRng,
    ) -> Result<FloorSet, DungeonError>;
}

impl DungeonStrategy {
    pub fn walker(self) -> &'static dyn WalkStrategy {
        match self {
            Self::Caverns => &CavernWalker,
            Self::Rooms => &RoomWalker,
            Self::WindingHalls => &WindingWalker,
        }
    }
}

/// Unconstrained single-step random walk; produces blob-like caverns.
pub struct CavernWalker;

/// Hallway then room, every iteration.
pub struct RoomWalker;

/// Hallway every iteration, room only when the gate roll passes.
pub struct WindingWalker;

impl WalkStrategy for CavernWalker {
    fn strategy(&self) -> DungeonStrategy {
        DungeonStrategy::Caverns
    }

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut DungeonRng,
    ) -> Result<FloorSet, DungeonError> {
        let mut floors = seeded_floor_set();
        let mut budget = StepBudget::new(self.strategy(), config);
        let mut current = Coord::ORIGIN;

        while floors.len() < config.target() {
            budget.spend(&floors)?;
            current = current.step(rng.direction());
            floors.insert(current);
        }

        budget.finish(&floors);
        Ok(floors)
    }
}

impl WalkStrategy for RoomWalker {
    fn strategy(&self) -> DungeonStrategy {
        DungeonStrategy::Rooms
    }

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut DungeonRng,
    ) -> Result<FloorSet, DungeonError> {
        walk_halls(self.strategy(), config, rng, |_| true)
    }
}

impl WalkStrategy for WindingWalker {
    fn strategy(&self) -> DungeonStrategy {
        DungeonStrategy::WindingHalls
    }

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut DungeonRng,
    ) -> Result<FloorSet, DungeonError> {
        let room_chance = u32::from(config.room_chance);
        walk_halls(self.strategy(), config, rng, |rng| rng.below(100) < room_chance)
    }
}

fn walk_halls<Gate>(
    strategy: DungeonStrategy,
    config: &GenerationConfig,
    rng: &mut DungeonRng,
    mut room_gate: Gate,
) -> Result<FloorSet, DungeonError>
where
    Gate: FnMut(&mut DungeonRng) -> bool,
{
    let mut floors = seeded_floor_set();
    let mut budget = StepBudget::new(strategy, config);
    let mut current = Coord::ORIGIN;

    while floors.len() < config.target() {
        budget.spend(&floors)?;
        let direction = rng.direction();
        let length = rng.inclusive(config.hallway_length.min, config.hallway_length.max);
        current = carve_hallway(&mut floors, current, direction, length);
        if room_gate(rng) {
            let half_width = rng.inclusive(config.room_half_extent.min, config.room_half_extent.max);
            let half_height =
                rng.inclusive(config.room_half_extent.min, config.room_half_extent.max);
            carve_room(
                &mut floors,
                current,
                signed_extent(half_width)?,
                signed_extent(half_height)?,
            );
        }
    }

    budget.finish(&floors);
    Ok(floors)
}

/// Steps `length` cells from `start`, adding each cell stepped onto. Returns
/// the hallway's endpoint.
fn carve_hallway(floors: &mut FloorSet, start: Coord, direction: Direction, length: u32) -> Coord {
    let mut current = start;
    for _ in 0..length {
        current = current.step(direction);
        floors.insert(current);
    }
    current
}

fn carve_room(floors: &mut FloorSet, center: Coord, half_width: i32, half_height: i32) {
    for dx in -half_width..=half_width {
        for dy in -half_height..=half_height {
            floors.insert(center.offset(dx, dy));
        }
    }
}

fn signed_extent(value: u32) -> Result<i32, DungeonError> {
    i32::try_from(value).map_err(|_| {
        DungeonError::Config(ConfigError::RangeTooLarge {
            parameter: "room_half_extent",
            max: value,
            limit: MAX_ROOM_HALF_EXTENT,
        })
    })
}

fn seeded_floor_set() -> FloorSet {
    let mut floors = FloorSet::new();
    floors.insert(Coord::ORIGIN);
    floors
}

struct StepBudget {
    strategy: DungeonStrategy,
    target: usize,
    limit: u64,
    steps: u64,
}

impl StepBudget {
    fn new(strategy: DungeonStrategy, config: &GenerationConfig) -> Self {
        Self {
            strategy,
            target: config.target(),
            limit: config.effective_stall_limit(),
            steps: 0,
        }
    }

    fn spend(&mut self, floors: &FloorSet) -> Result<(), DungeonError> {
        if self.steps >= self.limit {
            tracing::warn!(
                strategy = %self.strategy,
                steps = self.steps,
                floor_count = floors.len(),
                target = self.target,
                "walk stalled before reaching target"
            );
            return Err(DungeonError::Stall {
                strategy: self.strategy,
                steps: self.steps,
                floor_count: floors.len(),
                target: self.target,
            });
        }
        self.steps += 1;
        Ok(())
    }

    fn finish(&self, floors: &FloorSet) {
        tracing::debug!(
            strategy = %self.strategy,
            steps = self.steps,
            floor_count = floors.len(),
            target = self.target,
            "walk complete"
        );
    }
}
