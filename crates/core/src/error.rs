//! Error types surfaced to the host. Pathfinding exhaustion is not among them:
//! the search hands back the agent's own cell and the agent patrols instead.

use thiserror::Error;

use crate::config::DungeonStrategy;
use crate::types::SpawnCategory;

/// Rejected configuration, detected before any generation work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target_floor_count must be positive")]
    ZeroTargetCount,

    #[error("{} spawn percentage {value} is outside 0..=100", category.label())]
    PercentOutOfRange { category: SpawnCategory, value: u8 },

    #[error("{} spawn percentage is {percent} but the {} catalog is empty", category.label(), category.label())]
    EmptyCatalog { category: SpawnCategory, percent: u8 },

    #[error("{parameter} range is inverted: min {min} > max {max}")]
    InvalidRange { parameter: &'static str, min: u32, max: u32 },

    #[error("{parameter} max {max} exceeds the limit of {limit}")]
    RangeTooLarge { parameter: &'static str, max: u32, limit: u32 },

    #[error("room_chance {value} is outside 0..=100")]
    RoomChanceOutOfRange { value: u8 },

    #[error("stall_limit must be positive")]
    ZeroStallLimit,

    #[error("agent setting {parameter} must be positive and finite")]
    InvalidAgentSetting { parameter: &'static str },

    #[error("failed to parse dungeon config: {0}")]
    Parse(String),

    #[error("failed to read dungeon config '{path}': {message}")]
    Read { path: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DungeonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "{strategy} walk stalled after {steps} steps with {floor_count} of {target} floor tiles"
    )]
    Stall { strategy: DungeonStrategy, steps: u64, floor_count: usize, target: usize },

    #[error("{strategy} walk produced no floor tiles to place an exit on")]
    EmptyFloorSet { strategy: DungeonStrategy },
}
