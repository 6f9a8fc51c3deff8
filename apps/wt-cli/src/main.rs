use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use wt_chem::OperatingPoint;
use wt_project::{ProjectError, compile_plant, load_plant};
use wt_sim::{Orchestrator, RunOptions, RunReporter, SimError};
use wt_train::StageClass;

mod report;

use report::{JsonReporter, TextReporter};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "wt-cli")]
#[command(about = "WaterTrain CLI - Water treatment plant simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate plant file syntax and structure
    Validate {
        /// Path to the plant YAML or JSON file
        plant_path: PathBuf,
    },
    /// List the stages of a plant in train order
    Stages {
        /// Path to the plant YAML or JSON file
        plant_path: PathBuf,
    },
    /// Run the plant once per operating point
    Run {
        /// Path to the plant YAML or JSON file
        plant_path: PathBuf,
        /// Run only at peak flow and cold temperature
        #[arg(long, conflicts_with = "all_points")]
        peak_cold: bool,
        /// Run at both average and peak-cold conditions
        #[arg(long)]
        all_points: bool,
        /// Emit run records as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { plant_path } => cmd_validate(&plant_path),
        Commands::Stages { plant_path } => cmd_stages(&plant_path),
        Commands::Run {
            plant_path,
            peak_cold,
            all_points,
            json,
        } => {
            let points = if all_points {
                vec![OperatingPoint::Average, OperatingPoint::PeakCold]
            } else if peak_cold {
                vec![OperatingPoint::PeakCold]
            } else {
                vec![OperatingPoint::Average]
            };
            cmd_run(&plant_path, &points, json)
        }
    }
}

fn cmd_validate(plant_path: &Path) -> CliResult<()> {
    println!("Validating plant: {}", plant_path.display());
    let plant = load_plant(plant_path)?;
    let (train, _) = compile_plant(&plant)?;
    println!("✓ Plant is valid ({} stages)", train.len());
    Ok(())
}

fn cmd_stages(plant_path: &Path) -> CliResult<()> {
    let plant = load_plant(plant_path)?;
    let (train, _) = compile_plant(&plant)?;

    println!("Stages in {}:", plant.name);
    for (def, stage) in plant.stages.iter().zip(train.stages()) {
        let class = match stage.kind.class() {
            StageClass::Influent => "influent",
            StageClass::Physical => "physical",
            StageClass::Dosing => "dosing",
            StageClass::Sample => "sample",
        };
        match stage.kind.dose() {
            Some(dose) => println!(
                "  {} - {} [{} {}] {:.2} mg/L",
                def.id,
                stage.name,
                class,
                stage.kind.label(),
                dose
            ),
            None => println!(
                "  {} - {} [{} {}]",
                def.id,
                stage.name,
                class,
                stage.kind.label()
            ),
        }
    }
    Ok(())
}

fn cmd_run(plant_path: &Path, points: &[OperatingPoint], json: bool) -> CliResult<()> {
    let plant = load_plant(plant_path)?;
    let (train, influent) = compile_plant(&plant)?;
    let orchestrator = Orchestrator::new();

    let stdout = io::stdout();
    let mut reporter: Box<dyn RunReporter<Error = CliError>> = if json {
        Box::new(JsonReporter::new(stdout.lock()))
    } else {
        println!("Running plant: {}", plant.name);
        let ids = plant.stages.iter().map(|s| s.id.clone()).collect();
        Box::new(TextReporter::new(stdout.lock(), ids))
    };

    for &point in points {
        let start = Instant::now();
        let record = orchestrator.run(&train, &influent, &RunOptions::at(point))?;
        tracing::debug!(
            point = ?point,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "run timing"
        );
        reporter.report(&record)?;
    }
    Ok(())
}
