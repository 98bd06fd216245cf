//! # Delve CLI
//!
//! Command-line surface over the generation entry points: loot parcels,
//! single encounters, and five-room dungeons, read from a JSON table
//! directory and written as pretty-printed JSON to stdout or a file.

use clap::{Args, Parser, Subcommand};
use delve::tables::{LootTables, Tables};
use delve::{
    config, generate_five_room_dungeon, generate_loot, generate_single_encounter, DelveResult,
};
use log::{info, LevelFilter};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Command line arguments for the Delve generators.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Generate loot parcels, encounters, and five-room dungeons from JSON tables")]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every generation subcommand.
#[derive(Args, Debug)]
struct CommonArgs {
    /// Random seed for deterministic output (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory containing the JSON data files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Optional path to write JSON output (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate loot parcels for an encounter level (loot.v1)
    Loot {
        /// Encounter level / challenge rating
        #[arg(short, long)]
        level: i32,

        /// Number of loot parcels to generate
        #[arg(short, long, default_value_t = 1)]
        rolls: u32,

        /// Loot data filename inside the data directory
        #[arg(long, default_value = "loot_data.json")]
        loot_file: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate a single encounter for a slot (encounter.v1)
    Encounter {
        /// Encounter level / CR band
        #[arg(short, long)]
        level: i32,

        /// Biome key (e.g. dungeon, forest, city)
        #[arg(short, long)]
        biome: String,

        /// Progression slot (entrance/puzzle/setback/climax/aftermath)
        #[arg(short, long)]
        slot: String,

        /// Loot data filename inside the data directory
        #[arg(long, default_value = "loot_data.json")]
        loot_file: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate a five-room dungeon (dungeon.5room.v1)
    Dungeon {
        /// Base level / CR band for the dungeon
        #[arg(short, long)]
        level: i32,

        /// Biome key (e.g. dungeon, forest, city)
        #[arg(short, long)]
        biome: String,

        /// Slot order override, comma separated (defaults to the progression table)
        #[arg(long, value_delimiter = ',')]
        slots: Vec<String>,

        /// Loot data filename inside the data directory
        #[arg(long, default_value = "loot_data.json")]
        loot_file: String,

        #[command(flatten)]
        common: CommonArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    initialize_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Initializes env_logger at the requested level; RUST_LOG still overrides.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn run(cli: Cli) -> DelveResult<()> {
    match cli.command {
        Command::Loot {
            level,
            rolls,
            loot_file,
            common,
        } => {
            let seed = resolve_seed(common.seed);
            info!("generating loot: level={} rolls={} seed={}", level, rolls, seed);
            let tables = LootTables::load(&common.data_dir.join(&loot_file))?;
            let record = generate_loot(level, rolls, seed, &tables)?;
            write_output(&serde_json::to_string_pretty(&record)?, common.output.as_deref())
        }

        Command::Encounter {
            level,
            biome,
            slot,
            loot_file,
            common,
        } => {
            let seed = resolve_seed(common.seed);
            info!(
                "generating encounter: level={} biome={} slot={} seed={}",
                level, biome, slot, seed
            );
            let tables = Tables::load_with_loot_file(&common.data_dir, &loot_file)?;
            let record = generate_single_encounter(level, &biome, &slot, seed, &tables)?;
            write_output(&serde_json::to_string_pretty(&record)?, common.output.as_deref())
        }

        Command::Dungeon {
            level,
            biome,
            slots,
            loot_file,
            common,
        } => {
            let seed = resolve_seed(common.seed);
            info!(
                "generating dungeon: base_level={} biome={} seed={}",
                level, biome, seed
            );
            let tables = Tables::load_with_loot_file(&common.data_dir, &loot_file)?;
            let override_slots = if slots.is_empty() {
                None
            } else {
                Some(slots.as_slice())
            };
            let record = generate_five_room_dungeon(level, &biome, seed, &tables, override_slots)?;
            write_output(&serde_json::to_string_pretty(&record)?, common.output.as_deref())
        }
    }
}

/// Uses the given seed, or draws a random one so the output record still
/// carries a value that reproduces the run.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..=config::MAX_SEED))
}

fn write_output(text: &str, output: Option<&Path>) -> DelveResult<()> {
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))?;
            info!("wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
