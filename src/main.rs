use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bemopt::components::ComponentRegistry;
use bemopt::config::{Config, DEFAULT_CONFIG};
use bemopt::diagnostics::{remap_names, NameMap};
use bemopt::optimizer::SolverKind;
use bemopt::{io, pipeline, telemetry};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "bemopt", version, about = "Building energy system optimization")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assemble and solve the configured system, then write results and reports
    Solve {
        /// Override the configured solver
        #[arg(long)]
        solver: Option<SolverKind>,
        /// Only write results.csv and summary.json
        #[arg(long)]
        no_report: bool,
    },
    /// Build reports from an existing var,value result table
    Report {
        #[arg(long)]
        results: PathBuf,
        /// Defaults to the configured output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the assembled model as an LP file for external solvers
    ExportLp {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Translate x<i>/c<i> names in a solver listing back to model names
    Remap {
        /// Name map written by export-lp
        #[arg(long)]
        names: PathBuf,
        /// Listing to translate, stdin when omitted
        input: Option<PathBuf>,
    },
    /// List the registered component types
    Components,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Components => {
            let registry = ComponentRegistry::with_builtin();
            for (name, template) in registry.iter() {
                println!(
                    "{name:<20} in: [{}] out: [{}]",
                    template.inputs.iter().join(", "),
                    template.outputs.iter().join(", ")
                );
            }
        }
        Command::Remap { names, input } => {
            let map = NameMap::read_csv(
                fs::File::open(&names).with_context(|| format!("opening {}", names.display()))?,
            )?;
            let text = match input {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
                    text
                }
            };
            print!("{}", remap_names(&text, &map));
        }
        command => {
            let config = Config::load(&cli.config)?;
            telemetry::init_tracing(config.logging.format, &config.logging.filter)?;
            info!(config = %cli.config.display(), "starting bemopt");

            match command {
                Command::Solve { solver, no_report } => {
                    let solver = solver.unwrap_or(config.run.solver);
                    let outcome = pipeline::run(&config, solver, !no_report)?;
                    println!("objective: {}", outcome.objective);
                }
                Command::Report { results, out } => {
                    let dir = out.unwrap_or_else(|| config.output.dir.clone());
                    fs::create_dir_all(&dir)
                        .with_context(|| format!("creating {}", dir.display()))?;
                    let table = io::load_results(&results)?;
                    pipeline::write_report(&table, &dir)?;
                }
                Command::ExportLp { out } => {
                    let dir = out.unwrap_or_else(|| config.output.dir.clone());
                    let (_, assembled) = pipeline::build_model(&config)?;
                    pipeline::export_lp(&assembled, &dir)?;
                }
                Command::Components | Command::Remap { .. } => {}
            }
        }
    }
    Ok(())
}
