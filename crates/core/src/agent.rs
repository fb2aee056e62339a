//! Tick-driven roaming agents that chase a target across a generated dungeon.
//!
//! Each agent is a small state machine that only changes at tick boundaries.
//! Moves are claimed in the occupancy map in the same tick they are decided,
//! so no two agents ever hold the same cell and cancelling an agent between
//! ticks always leaves the roster consistent.

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::config::AgentConfig;
use crate::error::ConfigError;
use crate::mapgen::{AGENT_STREAM_BASE, DungeonRng, GeneratedDungeon};
use crate::pathfinding;
use crate::types::{AgentId, Coord, SpawnCategory};

/// Continuous position used while an agent slides between cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn at(cell: Coord) -> Self {
        Self { x: cell.x as f32, y: cell.y as f32 }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentPhase {
    /// Waiting for the next decision.
    Thinking { wait: u32 },
    Moving { to: Coord },
    Cooldown { remaining: u32 },
    /// Recovering after an attack.
    Recovering { remaining: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentEvent {
    Moved { agent: AgentId, from: Coord, to: Coord },
    Patrolled { agent: AgentId, from: Coord, to: Coord },
    Attacked { agent: AgentId, hit: bool, damage: u32 },
    Arrived { agent: AgentId, cell: Coord },
    Idle { agent: AgentId, cell: Coord },
}

#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    cell: Coord,
    position: Point,
    phase: AgentPhase,
    rng: DungeonRng,
}

impl Agent {
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The cell this agent has claimed: where it stands, or where it is heading.
    pub fn cell(&self) -> Coord {
        self.cell
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }
}

pub struct AgentRoster {
    agents: SlotMap<AgentId, Agent>,
    occupancy: BTreeMap<Coord, AgentId>,
    config: AgentConfig,
    seed: u64,
    spawned: u64,
}

impl AgentRoster {
    pub fn new(config: AgentConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            agents: SlotMap::with_key(),
            occupancy: BTreeMap::new(),
            config,
            seed,
            spawned: 0,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn occupant(&self, cell: Coord) -> Option<AgentId> {
        self.occupancy.get(&cell).copied()
    }

    /// Places a new agent on `cell`. Fails on non-floor or already claimed cells.
    pub fn spawn(&mut self, dungeon: &GeneratedDungeon, cell: Coord) -> Option<AgentId> {
        if !dungeon.is_walkable(cell) || self.occupancy.contains_key(&cell) {
            return None;
        }
        let rng = DungeonRng::for_stream(self.seed, AGENT_STREAM_BASE + self.spawned);
        self.spawned += 1;
        let wait = self.config.think_interval_ticks;
        let id = self.agents.insert_with_key(|id| Agent {
            id,
            cell,
            position: Point::at(cell),
            phase: AgentPhase::Thinking { wait },
            rng,
        });
        self.occupancy.insert(cell, id);
        tracing::debug!(?id, x = cell.x, y = cell.y, "agent spawned");
        Some(id)
    }

    /// Spawns one agent on every enemy placement of `dungeon`.
    pub fn spawn_enemies(&mut self, dungeon: &GeneratedDungeon) -> Vec<AgentId> {
        let cells: Vec<Coord> =
            dungeon.spawns_of(SpawnCategory::Enemy).map(|spawn| spawn.coord).collect();
        cells.into_iter().filter_map(|cell| self.spawn(dungeon, cell)).collect()
    }

    /// Removes the agent together with its cell claim.
    pub fn cancel(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(id)?;
        self.occupancy.remove(&agent.cell);
        tracing::debug!(?id, "agent cancelled");
        Some(agent)
    }

    /// Advances every agent by one tick against `target`, in key order.
    pub fn tick(&mut self, dungeon: &GeneratedDungeon, target: Coord) -> Vec<AgentEvent> {
        let Self { agents, occupancy, config, .. } = self;
        let mut events = Vec::new();
        for (id, agent) in agents.iter_mut() {
            if let Some(event) = advance(agent, occupancy, config, dungeon, target) {
                tracing::trace!(?id, ?event, "agent event");
                events.push(event);
            }
        }
        events
    }
}

fn advance(
    agent: &mut Agent,
    occupancy: &mut BTreeMap<Coord, AgentId>,
    config: &AgentConfig,
    dungeon: &GeneratedDungeon,
    target: Coord,
) -> Option<AgentEvent> {
    let phase = agent.phase;
    match phase {
        AgentPhase::Thinking { wait } if wait > 1 => {
            agent.phase = AgentPhase::Thinking { wait: wait - 1 };
            None
        }
        AgentPhase::Thinking { .. } => Some(decide(agent, occupancy, config, dungeon, target)),
        AgentPhase::Moving { to } => slide(agent, config, to),
        AgentPhase::Cooldown { remaining } if remaining > 1 => {
            agent.phase = AgentPhase::Cooldown { remaining: remaining - 1 };
            None
        }
        AgentPhase::Recovering { remaining } if remaining > 1 => {
            agent.phase = AgentPhase::Recovering { remaining: remaining - 1 };
            None
        }
        AgentPhase::Cooldown { .. } | AgentPhase::Recovering { .. } => {
            agent.phase = AgentPhase::Thinking { wait: config.think_interval_ticks };
            None
        }
    }
}

fn decide(
    agent: &mut Agent,
    occupancy: &mut BTreeMap<Coord, AgentId>,
    config: &AgentConfig,
    dungeon: &GeneratedDungeon,
    target: Coord,
) -> AgentEvent {
    let distance = agent.position.distance(Point::at(target));
    if distance <= config.attack_range {
        let hit = agent.rng.below(2) == 0;
        let damage = agent.rng.below(100);
        agent.phase = AgentPhase::Recovering { remaining: config.attack_recovery_ticks };
        tracing::debug!(id = ?agent.id, hit, damage, "agent attacked");
        return AgentEvent::Attacked { agent: agent.id, hit, damage };
    }

    let from = agent.cell;
    if distance <= config.alert_range {
        let id = agent.id;
        let step = pathfinding::next_step(from, target, |cell| {
            dungeon.is_walkable(cell) && occupancy.get(&cell).is_none_or(|owner| *owner == id)
        });
        if step != from {
            claim(agent, occupancy, step);
            return AgentEvent::Moved { agent: id, from, to: step };
        }
        tracing::trace!(?id, "no step toward target; patrolling");
    }

    let open: Vec<Coord> = from
        .neighbors()
        .into_iter()
        .filter(|cell| dungeon.is_walkable(*cell) && !occupancy.contains_key(cell))
        .collect();
    if open.is_empty() {
        agent.phase = AgentPhase::Cooldown { remaining: cooldown(agent, config) };
        return AgentEvent::Idle { agent: agent.id, cell: from };
    }
    let to = open[agent.rng.index(open.len())];
    claim(agent, occupancy, to);
    AgentEvent::Patrolled { agent: agent.id, from, to }
}

fn claim(agent: &mut Agent, occupancy: &mut BTreeMap<Coord, AgentId>, to: Coord) {
    occupancy.remove(&agent.cell);
    occupancy.insert(to, agent.id);
    agent.cell = to;
    agent.phase = AgentPhase::Moving { to };
}

fn slide(agent: &mut Agent, config: &AgentConfig, to: Coord) -> Option<AgentEvent> {
    let goal = Point::at(to);
    let remaining = agent.position.distance(goal);
    if remaining > config.speed {
        let scale = config.speed / remaining;
        agent.position.x += (goal.x - agent.position.x) * scale;
        agent.position.y += (goal.y - agent.position.y) * scale;
    } else {
        agent.position = goal;
    }

    if agent.position.distance(goal) > config.arrival_tolerance {
        return None;
    }
    agent.position = goal;
    agent.phase = AgentPhase::Cooldown { remaining: cooldown(agent, config) };
    Some(AgentEvent::Arrived { agent: agent.id, cell: to })
}

fn cooldown(agent: &mut Agent, config: &AgentConfig) -> u32 {
    agent.rng.inclusive(config.cooldown_ticks.min, config.cooldown_ticks.max)
}
