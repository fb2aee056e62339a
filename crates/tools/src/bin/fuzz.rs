use std::collections::{BTreeSet, VecDeque};

use anyhow::{Result, ensure};
use clap::Parser;
use dungeon_core::mapgen::{GeneratedDungeon, generate_dungeon};
use dungeon_core::{AgentConfig, AgentRoster, Coord, DungeonStrategy, GenerationConfig, TileKind};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to sweep
    #[arg(short, long, default_value_t = 50)]
    cases: u64,
    #[arg(short, long, default_value_t = 1000)]
    ticks: u32,
    #[arg(long, default_value_t = 400)]
    target: u32,
}

fn fuzz_config(strategy: DungeonStrategy, target: u32) -> GenerationConfig {
    GenerationConfig {
        item_spawn_percent: 30,
        enemy_spawn_percent: 20,
        item_catalog: vec!["potion".to_string(), "scroll".to_string()],
        enemy_catalog: vec!["slime".to_string(), "bat".to_string()],
        ..GenerationConfig::with_strategy(strategy, target)
    }
}

fn check_layout(dungeon: &GeneratedDungeon, target: u32) -> Result<()> {
    let floors = dungeon.floors();
    ensure!(floors.len() >= target as usize, "Invariant failed: floor count below target");
    ensure!(floors.first() == Some(Coord::ORIGIN), "Invariant failed: walk did not start at origin");
    ensure!(floors.last() == Some(dungeon.exit()), "Invariant failed: exit is not the last floor");

    let mut visited = BTreeSet::from([Coord::ORIGIN]);
    let mut queue = VecDeque::from([Coord::ORIGIN]);
    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if dungeon.is_walkable(neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    ensure!(visited.len() == floors.len(), "Invariant failed: floors are not connected");

    for (wall, mask) in dungeon.edges().iter() {
        ensure!(!floors.contains(wall), "Invariant failed: wall {wall:?} overlaps a floor");
        ensure!(!mask.is_enclosed(), "Invariant failed: cardinal wall {wall:?} is enclosed");
    }
    for spawn in dungeon.spawns() {
        ensure!(
            spawn.coord != dungeon.exit(),
            "Invariant failed: {} placed on the exit",
            spawn.category.label()
        );
    }
    Ok(())
}

fn check_agents(dungeon: &GeneratedDungeon, seed: u64, ticks: u32) -> Result<usize> {
    let mut roster = AgentRoster::new(AgentConfig::default(), seed)?;
    roster.spawn_enemies(dungeon);
    let mut events = 0;
    for _ in 0..ticks {
        events += roster.tick(dungeon, dungeon.exit()).len();
        let mut claimed = BTreeSet::new();
        for agent in roster.iter() {
            ensure!(
                dungeon.tile_at(agent.cell()) == TileKind::Floor,
                "Invariant failed: agent off the floor"
            );
            ensure!(claimed.insert(agent.cell()), "Invariant failed: two agents share a cell");
        }
    }
    Ok(events)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer())
        .init();
    let args = Args::parse();

    println!(
        "Starting fuzz sweep over {} seeds from {} ({} ticks each)...",
        args.cases, args.seed, args.ticks
    );
    for seed in args.seed..args.seed.saturating_add(args.cases) {
        for strategy in DungeonStrategy::ALL {
            let dungeon = generate_dungeon(&fuzz_config(strategy, args.target), seed)?;
            check_layout(&dungeon, args.target)
                .map_err(|error| error.context(format!("{strategy} seed {seed}")))?;
            let events = check_agents(&dungeon, seed, args.ticks)
                .map_err(|error| error.context(format!("{strategy} agents seed {seed}")))?;
            tracing::debug!(%strategy, seed, events, "seed passed");
        }
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
