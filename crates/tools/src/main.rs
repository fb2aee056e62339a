use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::mapgen::{DungeonGenerator, GeneratedDungeon};
use dungeon_core::{Coord, DungeonStrategy, GenerationConfig, SpawnCategory};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML generation config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Overrides the strategy from the config file
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Overrides the target floor count from the config file
    #[arg(short, long)]
    target: Option<u32>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Caverns,
    Rooms,
    WindingHalls,
}

impl From<StrategyArg> for DungeonStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Caverns => Self::Caverns,
            StrategyArg::Rooms => Self::Rooms,
            StrategyArg::WindingHalls => Self::WindingHalls,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

#[derive(Serialize)]
struct DungeonExport<'a> {
    strategy: DungeonStrategy,
    seed: u64,
    fingerprint: String,
    floors: &'a [Coord],
    walls: Vec<WallExport>,
    exit: Coord,
    spawns: Vec<SpawnExport<'a>>,
}

#[derive(Serialize)]
struct WallExport {
    coord: Coord,
    mask: u8,
    variant: Option<usize>,
}

#[derive(Serialize)]
struct SpawnExport<'a> {
    coord: Coord,
    category: SpawnCategory,
    name: &'a str,
}

impl<'a> DungeonExport<'a> {
    fn new(dungeon: &'a GeneratedDungeon, config: &'a GenerationConfig) -> Self {
        let walls = dungeon
            .edges()
            .iter()
            .map(|(coord, mask)| WallExport {
                coord,
                mask: mask.bits(),
                variant: mask.variant_index(),
            })
            .collect();
        let spawns = dungeon
            .spawns()
            .iter()
            .map(|spawn| SpawnExport {
                coord: spawn.coord,
                category: spawn.category,
                name: config
                    .catalog(spawn.category)
                    .get(spawn.catalog_index)
                    .map_or("", String::as_str),
            })
            .collect();
        Self {
            strategy: dungeon.strategy(),
            seed: dungeon.seed(),
            fingerprint: format!("{:016x}", dungeon.fingerprint()),
            floors: dungeon.floors().as_slice(),
            walls,
            exit: dungeon.exit(),
            spawns,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if let Some(target) = args.target {
        config.target_floor_count = target;
    }
    Ok(config)
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(&args)?;

    let generator = DungeonGenerator::new(config, args.seed).context("Invalid generation config")?;
    let dungeon = generator
        .generate()
        .with_context(|| format!("Generation failed for seed {}", args.seed))?;
    tracing::info!(
        strategy = %dungeon.strategy(),
        floors = dungeon.floors().len(),
        walls = dungeon.walls().len(),
        spawns = dungeon.spawns().len(),
        "dungeon generated"
    );

    match args.format {
        OutputFormat::Ascii => {
            println!("{}", dungeon.render_ascii());
            println!(
                "Strategy: {}  Seed: {}  Floors: {}  Fingerprint: {:016x}",
                dungeon.strategy(),
                dungeon.seed(),
                dungeon.floors().len(),
                dungeon.fingerprint()
            );
        }
        OutputFormat::Json => {
            let export = DungeonExport::new(&dungeon, generator.config());
            let json = serde_json::to_string_pretty(&export)
                .context("Failed to serialize dungeon JSON")?;
            println!("{json}");
        }
    }

    Ok(())
}
