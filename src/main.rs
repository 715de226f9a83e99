// src/main.rs
// PERSONAPOLL - simulated survey responses from archetypal personas
// One OpenAI-compatible completion per (persona, statement), repeated per run.

use std::path::{Path, PathBuf};

use clap::Parser;

// Modules
mod client;
mod errors;
mod export;
mod integrity;
mod prompt;
mod simulation;
mod survey;
mod validator;

use client::OpenAiClient;
use errors::SimResult;
use simulation::{RunPaths, SimulationEngine};

const PERSONA_FILE: &str = "group_personas.txt";
const STATEMENT_FILE: &str = "survey_statements.txt";

#[derive(Parser, Debug)]
#[command(
    name = "personapoll",
    about = "Simulates how each group type would rate every survey statement"
)]
struct Args {
    /// Experiment identifier, used to key the log file and output folders
    #[arg(short = 'e', long)]
    experiment: String,

    /// Number of simulation runs per group type
    #[arg(short = 's', long)]
    sims: u32,
}

/// All log output goes to a per-experiment file; the console is reserved
/// for progress. RUST_LOG still overrides the level.
fn init_logging(experiment: &str) -> SimResult<()> {
    let log_file = std::fs::File::create(format!("E{experiment}_personapoll.log"))?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn run(args: &Args) -> SimResult<()> {
    init_logging(&args.experiment)?;
    println!("🗳️ PersonaPoll Survey Simulator Starting...");
    log::info!(
        "Experiment E{} started at {}",
        args.experiment,
        chrono::Local::now().to_rfc3339()
    );

    let personas = survey::load_personas(Path::new(PERSONA_FILE))?;
    let statements = survey::load_statements(Path::new(STATEMENT_FILE))?;

    let backend = OpenAiClient::from_env()?;
    let mut engine = SimulationEngine::new(&backend);
    let paths = RunPaths::for_experiment(&args.experiment);
    engine.run(&args.experiment, args.sims, &personas, &statements, &paths)?;

    // Presentation pass over everything the runs exported.
    let formatted_dir = PathBuf::from(format!("data/E{}_simulated_responses", args.experiment));
    export::format_workbooks_in_folder(&paths.raw_export_dir, &formatted_dir)?;

    let counters = engine.counters();
    println!(
        "✅ Done. +100 ratings: {}   -100 ratings: {}",
        counters.plus_100, counters.minus_100
    );
    log::info!(
        "Experiment E{} finished at {}",
        args.experiment,
        chrono::Local::now().to_rfc3339()
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
