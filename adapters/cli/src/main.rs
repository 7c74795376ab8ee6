#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a tower defense blueprint headlessly.

mod placement;
mod report;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tower_defense_engine::{EngineConfig, PersistenceService, SimulationEngine};
use tower_defense_persistence::JsonPersistence;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    placement::Placement,
    report::{Outcome, RunReport},
};

/// Blueprint played when none is given.
const DEFAULT_BLUEPRINT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/demo.json");

/// Command-line options for a headless run.
#[derive(Debug, Parser)]
#[command(
    name = "tower-defense",
    version,
    about = "Plays a tower defense blueprint without a display"
)]
struct Cli {
    /// Blueprint JSON document describing the scenario.
    #[arg(long, default_value = DEFAULT_BLUEPRINT)]
    blueprint: PathBuf,

    /// TOML file overriding the engine tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Tower to build before the first tick, as `name@column,row`.
    #[arg(long = "place", value_name = "NAME@COLUMN,ROW")]
    towers: Vec<Placement>,

    /// Item to buy before the first tick, as `name@column,row`.
    #[arg(long = "item", value_name = "NAME@COLUMN,ROW")]
    items: Vec<Placement>,

    /// Saved game to resume instead of starting fresh.
    #[arg(long)]
    load: Option<PathBuf>,

    /// File receiving the saved game once the run ends.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Entry point for the tower defense command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let persistence = JsonPersistence::new().pretty();
    let config = load_config(cli.config.as_deref())?;
    let blueprint = persistence
        .load_blueprint(&cli.blueprint)
        .with_context(|| format!("failed to load blueprint {}", cli.blueprint.display()))?;
    let mut engine = SimulationEngine::with_schema_factory(config, blueprint)
        .context("blueprint does not describe a playable game")?;

    if let Some(path) = &cli.load {
        engine
            .load_game(&persistence, path)
            .with_context(|| format!("failed to resume {}", path.display()))?;
        info!(path = %path.display(), clock = engine.clock(), "resumed saved game");
    }

    for tower in &cli.towers {
        let _ = engine
            .place_tower(tower.tile, &tower.name)
            .with_context(|| format!("could not build {}", describe(tower)))?;
    }
    for item in &cli.items {
        let _ = engine
            .place_item(item.tile, &item.name)
            .with_context(|| format!("could not buy {}", describe(item)))?;
    }

    let (report, outcome) = play(&mut engine, cli.ticks);

    println!("{report}");
    println!("outcome:           {outcome}");
    println!(
        "money {} | lives {} | score {} | clock {}",
        engine.money(),
        engine.lives(),
        engine.score(),
        engine.clock()
    );

    if let Some(path) = &cli.save {
        engine
            .save_game(&persistence, path)
            .with_context(|| format!("failed to save {}", path.display()))?;
        println!("saved to {}", path.display());
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read engine config {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse engine config {}", path.display()))
}

fn play(engine: &mut SimulationEngine, ticks: u64) -> (RunReport, Outcome) {
    let mut report = RunReport::default();
    let mut events = Vec::new();

    while report.ticks() < ticks {
        events.clear();
        engine.update_game(&mut events);
        engine.check_collisions(&mut events);
        report.record(&events);

        if engine.is_game_lost() {
            warn!(clock = engine.clock(), "player ran out of lives");
            return (report, Outcome::Lost);
        }
        if engine.is_game_won() {
            info!(clock = engine.clock(), "every wave cleared");
            return (report, Outcome::Won);
        }
    }

    (report, Outcome::Undecided)
}

fn describe(placement: &Placement) -> String {
    format!(
        "{} at ({}, {})",
        placement.name,
        placement.tile.column(),
        placement.tile.row()
    )
}
