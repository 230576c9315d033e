//! Headless Dungeon Runner
//!
//! Runs the dungeon without a player and prints a summary per seed. With
//! `--runs` greater than one, consecutive seeds are simulated in parallel.

use std::path::PathBuf;

use clap::Parser;
use dungeon_economy::core::config::SimulationConfig;
use dungeon_economy::memory::DirectoryBlobStore;
use dungeon_economy::simulation::{PressureMeters, RunTotals, Simulation};
use rayon::prelude::*;
use serde::Serialize;

/// Headless Dungeon Runner - unattended runs for balancing
#[derive(Parser, Debug)]
#[command(name = "headless_sim")]
#[command(about = "Run the dungeon economy without a player and report the outcome")]
struct Args {
    /// Maximum ticks per run
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Random seed for the first run
    #[arg(long)]
    seed: Option<u64>,

    /// Number of runs on consecutive seeds
    #[arg(long, default_value_t = 1)]
    runs: u64,

    /// TOML config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for regulars' memory (single runs only)
    #[arg(long)]
    memory_dir: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    halted: Option<String>,
    resources: u32,
    meters: PressureMeters,
    totals: RunTotals,
    remembered_regulars: usize,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter("dungeon_economy=warn")
        .with_writer(std::io::stderr)
        .init();

    let base = match &args.config {
        Some(path) => match SimulationConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    let first_seed = args.seed.unwrap_or_else(rand::random);

    if args.memory_dir.is_some() && args.runs > 1 {
        eprintln!("Warning: --memory-dir is ignored when --runs is greater than 1");
    }

    let results: Vec<Result<RunSummary, String>> = (0..args.runs)
        .into_par_iter()
        .map(|i| {
            let mut config = base.clone();
            config.seed = first_seed.wrapping_add(i);
            let memory_dir = if args.runs == 1 {
                args.memory_dir.clone()
            } else {
                None
            };
            run_once(config, args.ticks, memory_dir)
        })
        .collect();

    let mut failed = false;
    let mut summaries = Vec::new();
    for result in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                eprintln!("Run failed: {}", e);
                failed = true;
            }
        }
    }

    if args.format == "json" {
        let json = if summaries.len() == 1 {
            serde_json::to_string_pretty(&summaries[0])
        } else {
            serde_json::to_string_pretty(&summaries)
        };
        match json {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize summary: {}", e);
                failed = true;
            }
        }
    } else {
        for summary in &summaries {
            print_text(summary);
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn run_once(
    config: SimulationConfig,
    max_ticks: u64,
    memory_dir: Option<PathBuf>,
) -> Result<RunSummary, String> {
    let seed = config.seed;
    let mut sim = Simulation::new(config).map_err(|e| e.to_string())?;
    if let Some(dir) = memory_dir {
        sim = sim.with_blob_store(DirectoryBlobStore::new(dir));
    }

    let ticks = sim.run(max_ticks);
    sim.flush_memory().map_err(|e| e.to_string())?;

    let state = sim.state();
    Ok(RunSummary {
        seed,
        ticks,
        halted: state.halted.map(|reason| reason.to_string()),
        resources: state.resources,
        meters: state.meters,
        totals: state.totals,
        remembered_regulars: state.store.len(),
    })
}

fn print_text(summary: &RunSummary) {
    println!("=== Seed {} ===", summary.seed);
    println!("Ticks:              {}", summary.ticks);
    println!(
        "Outcome:            {}",
        summary.halted.as_deref().unwrap_or("survived")
    );
    println!("Resources:          {}", summary.resources);
    println!(
        "Political/economic: {}/{}",
        summary.meters.political_risk, summary.meters.economic_pressure
    );
    println!(
        "Parties:            {} spawned, {} exited, {} wiped",
        summary.totals.parties_spawned, summary.totals.parties_exited, summary.totals.parties_wiped
    );
    println!(
        "Deaths/kills:       {}/{}",
        summary.totals.adventurer_deaths, summary.totals.mob_kills
    );
    println!("Loot cashed:        {}", summary.totals.loot_cashed);
    println!("Regulars:           {}", summary.remembered_regulars);
    println!();
}
