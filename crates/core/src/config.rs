//! Generation and agent configuration, loadable from TOML.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::SpawnCategory;

const DEFAULT_TARGET_FLOOR_COUNT: u32 = 500;
const MIN_STALL_LIMIT: u64 = 4_096;
const STALL_STEPS_PER_TARGET_TILE: u64 = 64;

/// Longest hallway a single walk iteration may carve.
pub const MAX_HALLWAY_LENGTH: u32 = 256;
/// Largest room half-extent; one room covers at most `(2 * 64 + 1)^2` cells.
pub const MAX_ROOM_HALF_EXTENT: u32 = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DungeonStrategy {
    #[default]
    Caverns,
    Rooms,
    WindingHalls,
}

impl DungeonStrategy {
    pub const ALL: [Self; 3] = [Self::Caverns, Self::Rooms, Self::WindingHalls];

    pub fn name(self) -> &'static str {
        match self {
            Self::Caverns => "caverns",
            Self::Rooms => "rooms",
            Self::WindingHalls => "winding_halls",
        }
    }
}

impl fmt::Display for DungeonStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How walls are derived around the floor set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallFill {
    /// Only the four cardinal neighbors of a floor tile become walls.
    #[default]
    Cardinal,
    /// The full 3x3 ring around each floor tile, diagonal corners included.
    Surround,
}

/// Inclusive integer range `min..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanRange {
    pub min: u32,
    pub max: u32,
}

impl SpanRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: u32) -> Self {
        Self { min: value, max: value }
    }

    pub fn contains(self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(self, parameter: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange { parameter, min: self.min, max: self.max });
        }
        Ok(())
    }

    fn check_within(self, parameter: &'static str, limit: u32) -> Result<(), ConfigError> {
        self.check(parameter)?;
        if self.max > limit {
            return Err(ConfigError::RangeTooLarge { parameter, max: self.max, limit });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub strategy: DungeonStrategy,
    pub target_floor_count: u32,
    pub hallway_length: SpanRange,
    pub room_half_extent: SpanRange,
    /// Percent chance that a WindingHalls iteration ends in a room.
    pub room_chance: u8,
    pub wall_fill: WallFill,
    pub item_spawn_percent: u8,
    pub enemy_spawn_percent: u8,
    pub item_catalog: Vec<String>,
    pub enemy_catalog: Vec<String>,
    /// Upper bound on walk iterations before generation reports a stall.
    pub stall_limit: Option<u64>,
    pub agents: AgentConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strategy: DungeonStrategy::Caverns,
            target_floor_count: DEFAULT_TARGET_FLOOR_COUNT,
            hallway_length: SpanRange::new(9, 17),
            room_half_extent: SpanRange::new(1, 4),
            room_chance: 50,
            wall_fill: WallFill::Cardinal,
            item_spawn_percent: 0,
            enemy_spawn_percent: 0,
            item_catalog: Vec::new(),
            enemy_catalog: Vec::new(),
            stall_limit: None,
            agents: AgentConfig::default(),
        }
    }
}

impl GenerationConfig {
    pub fn with_strategy(strategy: DungeonStrategy, target_floor_count: u32) -> Self {
        Self { strategy, target_floor_count, ..Self::default() }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_floor_count == 0 {
            return Err(ConfigError::ZeroTargetCount);
        }
        self.hallway_length.check_within("hallway_length", MAX_HALLWAY_LENGTH)?;
        self.room_half_extent.check_within("room_half_extent", MAX_ROOM_HALF_EXTENT)?;
        if self.room_chance > 100 {
            return Err(ConfigError::RoomChanceOutOfRange { value: self.room_chance });
        }
        check_spawn_rule(SpawnCategory::Item, self.item_spawn_percent, &self.item_catalog)?;
        check_spawn_rule(SpawnCategory::Enemy, self.enemy_spawn_percent, &self.enemy_catalog)?;
        if self.stall_limit == Some(0) {
            return Err(ConfigError::ZeroStallLimit);
        }
        self.agents.validate()
    }

    pub fn target(&self) -> usize {
        self.target_floor_count as usize
    }

    pub fn effective_stall_limit(&self) -> u64 {
        self.stall_limit.unwrap_or_else(|| {
            u64::from(self.target_floor_count)
                .saturating_mul(STALL_STEPS_PER_TARGET_TILE)
                .max(MIN_STALL_LIMIT)
        })
    }

    pub fn spawn_percent(&self, category: SpawnCategory) -> u8 {
        match category {
            SpawnCategory::Item => self.item_spawn_percent,
            SpawnCategory::Enemy => self.enemy_spawn_percent,
        }
    }

    pub fn catalog(&self, category: SpawnCategory) -> &[String] {
        match category {
            SpawnCategory::Item => &self.item_catalog,
            SpawnCategory::Enemy => &self.enemy_catalog,
        }
    }
}

fn check_spawn_rule(
    category: SpawnCategory,
    percent: u8,
    catalog: &[String],
) -> Result<(), ConfigError> {
    if percent > 100 {
        return Err(ConfigError::PercentOutOfRange { category, value: percent });
    }
    if percent > 0 && catalog.is_empty() {
        return Err(ConfigError::EmptyCatalog { category, percent });
    }
    Ok(())
}

/// Timing and sensing parameters for roaming agents, in simulation ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub think_interval_ticks: u32,
    pub attack_recovery_ticks: u32,
    pub cooldown_ticks: SpanRange,
    /// Cells travelled per tick while interpolating toward the next cell.
    pub speed: f32,
    pub arrival_tolerance: f32,
    pub alert_range: f32,
    pub attack_range: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            think_interval_ticks: 5,
            attack_recovery_ticks: 25,
            cooldown_ticks: SpanRange::new(50, 200),
            speed: 0.1,
            arrival_tolerance: 0.01,
            alert_range: 6.0,
            attack_range: 1.1,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.think_interval_ticks == 0 {
            return Err(ConfigError::InvalidAgentSetting { parameter: "think_interval_ticks" });
        }
        self.cooldown_ticks.check("cooldown_ticks")?;
        for (parameter, value) in [
            ("speed", self.speed),
            ("arrival_tolerance", self.arrival_tolerance),
            ("alert_range", self.alert_range),
            ("attack_range", self.attack_range),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidAgentSetting { parameter });
            }
        }
        Ok(())
    }
}
