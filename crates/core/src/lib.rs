pub mod agent;
pub mod config;
pub mod error;
pub mod mapgen;
pub mod pathfinding;
pub mod types;

pub use agent::{Agent, AgentEvent, AgentPhase, AgentRoster, Point};
pub use config::{
    AgentConfig, DungeonStrategy, GenerationConfig, MAX_HALLWAY_LENGTH, MAX_ROOM_HALF_EXTENT,
    SpanRange, WallFill,
};
pub use error::{ConfigError, DungeonError};
pub use mapgen::{DungeonGenerator, GeneratedDungeon, TileSink, generate_dungeon};
pub use pathfinding::{MAX_EXPANSIONS, next_step};
pub use types::*;
