//! `cubectl` – command-line front end for the Rubik's cube solving engine.
//!
//! Loads the engine build matching this host once per invocation and runs a
//! single operation, a scripted scenario, or an interactive session.

mod logging;
mod repl;

use clap::{ArgAction, Parser, Subcommand};
use cube::config::{load_config, CubeConfig};
use cube::doctor::{run_doctor, DoctorReport};
use cube::platform::SystemHost;
use cube::scenario::{load_scenario, run_scenario, ScenarioResult, StepStatus};
use cube::{create_cube_with, Cube, Loader, SolveOptions, SolveResult, DEFAULT_STEP};
use std::path::{Path, PathBuf};

/// Exit code for a non-OK solve or a failed scenario.
const EXIT_FAIL: i32 = 1;
/// Exit code for configuration, input, or engine load errors.
const EXIT_ERROR: i32 = 2;

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "cubectl",
    version,
    about = "Solve, color and decompose Rubik's cube configurations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a maneuver taking <src> to the target configuration.
    Solve {
        /// Source facelet string.
        src: String,
        /// Target facelet string (defaults to the solved cube).
        #[arg(long)]
        target: Option<String>,
        /// Maximum solution length.
        #[arg(long, default_value_t = DEFAULT_STEP)]
        step: u32,
        /// Keep searching for a shorter solution after the first one.
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        best: bool,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Apply a maneuver to a cube and print the resulting facelets.
    Color {
        maneuver: String,
        /// Starting facelet string (defaults to the solved cube).
        #[arg(long)]
        cube: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Decompose a maneuver into cubie cycles.
    Perm {
        maneuver: String,
        #[arg(long)]
        json: bool,
    },

    /// Check whether a facelet string is solvable.
    Solvable {
        cube: String,
        #[arg(long)]
        json: bool,
    },

    /// Interactive session.
    Repl,

    /// Run a scripted scenario from a YAML file.
    Run {
        /// Path to the scenario YAML file.
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Report which engine build this host selects and whether it loads.
    Doctor {
        #[arg(long)]
        json: bool,
        /// Write the report JSON to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: invalid configuration: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    };
    logging::init_logging(&config.logging);

    if let Commands::Doctor { json, out } = cli.command {
        cmd_doctor(&config, json, out).await;
        return;
    }

    let cube = load_cube(&config).await;

    match cli.command {
        Commands::Solve {
            src,
            target,
            step,
            best,
            json,
        } => cmd_solve(&cube, &src, target, step, best, json),
        Commands::Color {
            maneuver,
            cube: start,
            json,
        } => {
            let out = cube.get_facecube(&maneuver, start.as_deref());
            output_value(&out, json);
        }
        Commands::Perm { maneuver, json } => {
            output_value(&cube.get_permutation(&maneuver), json);
        }
        Commands::Solvable { cube: src, json } => {
            output_value(&cube.solvable(&src), json);
        }
        Commands::Repl => repl::run(&cube),
        Commands::Run { file, json } => cmd_run(&cube, &file, json),
        Commands::Doctor { .. } => unreachable!("handled before loading"),
    }
}

async fn load_cube(config: &CubeConfig) -> Cube {
    let loader = Loader::from_config(&config.engine);
    match create_cube_with(&loader, &SystemHost).await {
        Ok(cube) => cube,
        Err(e) => {
            tracing::error!(error = %e, "failed to load engine");
            eprintln!("error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

fn cmd_solve(cube: &Cube, src: &str, target: Option<String>, step: u32, best: bool, json: bool) {
    let mut opts = SolveOptions::default().step(step).best(best);
    if let Some(t) = target {
        opts = opts.dest(t);
    }
    let result = cube.solve_ultimate(src, &opts);
    output_solve(&result, json);
}

fn cmd_run(cube: &Cube, file: &Path, json: bool) {
    let yaml = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read scenario file {}: {}", file.display(), e);
            std::process::exit(EXIT_ERROR);
        }
    };
    let scenario = match load_scenario(&yaml) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    };

    let result = run_scenario(&scenario, cube);
    output_scenario(&result, json);
}

async fn cmd_doctor(config: &CubeConfig, json: bool, out: Option<PathBuf>) {
    let report = run_doctor(&SystemHost, &config.engine).await;
    if let Some(ref path) = out {
        write_result_file(path, &report);
    }
    output_doctor(&report, json);
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn output_value<T: serde::Serialize + std::fmt::Display>(value: &T, json: bool) {
    if json {
        println!("{}", serde_json::to_string(value).unwrap_or_default());
    } else {
        println!("{}", value);
    }
}

fn output_solve(r: &SolveResult, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(r).unwrap_or_default());
    } else if r.is_ok() {
        println!("{}", r.solution);
    } else {
        println!(
            "[FAIL] {}: {}",
            r.status_code,
            r.status_code.description()
        );
    }

    if !r.is_ok() {
        std::process::exit(EXIT_FAIL);
    }
}

fn output_scenario(r: &ScenarioResult, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(r).unwrap_or_default());
    } else {
        println!("Scenario: {}", r.name.as_deref().unwrap_or("<unnamed>"));
        println!("Overall: {:?}", r.overall_status);
        for (i, sr) in r.step_results.iter().enumerate() {
            println!("  Step {}: {} -> {:?} {}", i, sr.op, sr.status, sr.output);
            if let Some(ref msg) = sr.message {
                println!("    {}", msg);
            }
        }
    }

    if r.overall_status == StepStatus::Fail {
        std::process::exit(EXIT_FAIL);
    }
}

fn output_doctor(r: &DoctorReport, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(r).unwrap_or_default());
    } else {
        let state = if r.engine_loaded { "PASS" } else { "ERROR" };
        println!("[{}] doctor", state);
        println!("  env:      os={} arch={}", r.os, r.arch);
        if let Some(ref p) = r.process {
            println!("  process:  {}", p.versions);
        }
        println!("  variant:  {}", r.variant);
        println!("  location: {}", r.location);
        if let Some(ref err) = r.error {
            println!("  error:    {}", err);
        }
    }

    if !r.engine_loaded {
        std::process::exit(EXIT_ERROR);
    }
}

fn write_result_file<T: serde::Serialize>(path: &Path, value: &T) {
    let j = serde_json::to_string_pretty(value).unwrap_or_default();
    if let Err(e) = std::fs::write(path, &j) {
        eprintln!(
            "warning: failed to write result to {}: {}",
            path.display(),
            e
        );
    }
}
