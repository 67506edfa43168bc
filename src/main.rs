use clap::Parser;
use dla_simulation::config::RunConfig;
use dla_simulation::output;
use dla_simulation::settings::{parse_count, PointStrategy, SchedulePolicy, SimulationSettings};
use dla_simulation::DlaSimulation;
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dla-simulation")]
#[command(about = "Diffusion-Limited Aggregation on a square lattice")]
struct Args {
    /// Lattice side length (odd)
    #[arg(value_parser = parse_grid_size)]
    grid_size: usize,

    /// Number of particles to release
    #[arg(value_parser = parse_particles)]
    num_particles: u64,

    /// Scheduling policy (sequential, dynamic, static)
    #[arg(long)]
    policy: Option<String>,

    /// Worker threads (defaults to available parallelism)
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Run seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Launch-point locking (fine, coarse)
    #[arg(long)]
    spawn: Option<String>,

    /// Give up on a launch point after this many attempts
    #[arg(long = "max-spawn-attempts")]
    max_spawn_attempts: Option<u64>,

    /// Result file (defaults to sequential_result.txt / parallel_result.txt)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print the crystal to the console
    #[arg(long, default_value = "false")]
    visual: bool,

    /// Write a JSON run report
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective settings to a JSON config file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,
}

fn parse_grid_size(s: &str) -> Result<usize, String> {
    parse_count::<u32>("Grid Size", s)
        .map(|n| n as usize)
        .map_err(|e| e.to_string())
}

fn parse_particles(s: &str) -> Result<u64, String> {
    parse_count("Number of Particles", s).map_err(|e| e.to_string())
}

/// Merge file settings with the command line; the command line wins
fn build_settings(args: &Args) -> Result<SimulationSettings, Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => Some(RunConfig::load_from_file(path)?),
        None => RunConfig::load_user_config()?,
    };
    let mut settings = match base {
        Some(config) => {
            debug!("Loaded config version {}", config.version);
            config.settings
        }
        None => SimulationSettings::default(),
    };

    settings.grid_size = args.grid_size;
    settings.num_particles = args.num_particles;
    if let Some(policy) = &args.policy {
        settings = settings.with_policy(SchedulePolicy::parse(policy)?);
    }
    if let Some(spawn) = &args.spawn {
        settings = settings.with_point_strategy(PointStrategy::parse(spawn)?);
    }
    if let Some(workers) = args.workers {
        settings = settings.with_workers(workers);
    }
    if let Some(seed) = args.seed {
        settings = settings.with_seed(seed);
    }
    if args.max_spawn_attempts.is_some() {
        settings.max_spawn_attempts = args.max_spawn_attempts;
    }
    settings.validate()?;
    Ok(settings)
}

/// Resolve and validate the settings, then save them if asked.
/// Nothing is written unless validation passes.
fn prepare(args: &Args) -> Result<SimulationSettings, Box<dyn std::error::Error>> {
    let settings = build_settings(args)?;
    if let Some(path) = &args.save_config {
        RunConfig::new(settings.clone()).save_to_file(path)?;
        info!("Saved config to {}", path.display());
    }
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let settings = prepare(&args)?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(settings.policy.default_output()));

    let mut sim = DlaSimulation::new(settings)?;
    info!(
        "Growing on a {n}x{n} lattice, {} policy, run seed {}",
        sim.settings().policy.name(),
        sim.seed(),
        n = sim.lattice().size()
    );
    let report = sim.run()?;
    let snapshot = sim.snapshot();
    info!(
        "Crystal holds {} cells, radius {}",
        snapshot.occupied_count(),
        sim.radius()
    );

    output::write_delimited(&snapshot, &output_path)?;
    info!("Wrote lattice to {}", output_path.display());

    if args.visual {
        print!("{}", output::render_text(&snapshot));
    }
    if let Some(path) = &args.summary {
        output::write_report(&report, path)?;
        info!("Wrote run report to {}", path.display());
    }

    println!("{} s", report.elapsed_secs);
    Ok(())
}
