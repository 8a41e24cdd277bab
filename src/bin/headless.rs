use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dronestrike::*;
use log::{error, info};
use thiserror::Error;

const DT: f32 = 1.0 / 60.0;
const MAX_TICKS: usize = 1_000_000;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("mission did not finish within {0} ticks")]
    Stalled(usize),
}

#[derive(Debug, Parser)]
#[command(name = "headless")]
#[command(about = "Run one strike mission to completion and print the analysis report", long_about = None)]
struct Args {
    /// City from the built-in catalogue
    city: String,

    /// Base to engage; repeatable. Defaults to every non-home base
    #[arg(long = "target", value_name = "NAME")]
    targets: Vec<String>,

    /// Starting fuel, overriding the config file
    #[arg(long)]
    fuel: Option<f32>,

    /// JSON file with simulation settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fly in calm weather instead of the simulated forecast
    #[arg(long)]
    calm: bool,

    /// Print the final snapshot as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> Result<String, RunError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(fuel) = args.fuel {
        config.starting_fuel = fuel;
        config.validate()?;
    }
    let graph = default_targets()?;

    // Without --target every non-home base of the city is engaged.
    let targets: Vec<String> = if args.targets.is_empty() {
        graph
            .bases_of(&args.city)?
            .iter()
            .filter(|b| !b.is_home())
            .map(|b| b.name.clone())
            .collect()
    } else {
        args.targets.clone()
    };
    let mut weather = SimulatedWeather::new(&args.city, config.weather_seed, config.weather_refresh_secs);
    let mut engine = Engine::new(graph, config)?;
    let names: Vec<&str> = targets.iter().map(String::as_str).collect();
    engine.start_mission_by_name(&args.city, &names)?;

    let calm = WeatherSnapshot::calm();
    let mut report = AnalysisReport::new();
    let mut ticks = 0;
    loop {
        if ticks >= MAX_TICKS {
            return Err(RunError::Stalled(MAX_TICKS));
        }
        weather.update(DT);
        let now = if args.calm { &calm } else { weather.current() };
        let state = engine.tick(DT, now, &mut report)?;
        ticks += 1;
        if state == ExecutorState::Complete {
            break;
        }
    }
    info!("finished after {ticks} ticks ({:.1}s simulated)", ticks as f32 * DT);

    if args.json {
        Ok(serde_json::to_string_pretty(&engine.snapshot())?)
    } else {
        Ok(format!("{}\n\n{}", report.generate_report(), engine.drone.state_snapshot()))
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
