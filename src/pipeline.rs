//! The batch run behind the command line: load, assemble, solve, report.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::assembly::{AssembledModel, Assembler};
use crate::components::ComponentRegistry;
use crate::config::Config;
use crate::diagnostics::NameMap;
use crate::io;
use crate::model::write_lp;
use crate::optimizer::{MilpSolver, ModelSolver, SolveOutcome, SolverKind};
use crate::postprocess::Report;
use crate::topology::Topology;

pub const RESULTS_FILE: &str = "results.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const REPORT_STEM: &str = "report";
pub const LP_FILE: &str = "model.lp";
pub const NAMES_FILE: &str = "model.names.csv";

/// Columns with every |value| at or below this are left out of reports
pub const ZERO_EPS: f64 = 1e-9;

/// Written next to the results of every solve
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub objective: f64,
    pub solver: SolverKind,
    pub components: usize,
    pub variables: usize,
    pub constraints: usize,
    pub disjunctions: usize,
    pub finished_at: DateTime<Utc>,
}

/// Read every input table named by `config` and assemble the model
pub fn build_model(config: &Config) -> Result<(Topology, AssembledModel)> {
    let inputs = &config.inputs;

    let (specs, connections) = io::load_topology(&inputs.topology)?;
    let mut catalog = io::load_models(&inputs.models)?;
    if let Some(path) = &inputs.prices {
        let prices = io::load_prices(path)?;
        io::apply_price_curves(&mut catalog, &prices);
    }

    let registry = ComponentRegistry::with_builtin();
    let topology = Topology::resolve(specs, connections, &registry, &catalog)
        .context("resolving topology")?;
    let profiles = io::load_profiles(&inputs.profiles)?;

    let mut assembler = Assembler::new(config.run.time_steps, config.economics(), profiles);
    if let Some(path) = &inputs.tariffs {
        assembler = assembler.with_tariffs(io::load_tariffs(path)?, config.site.clone());
    }
    let assembled = assembler.assemble(&topology).context("assembling model")?;
    Ok((topology, assembled))
}

/// Group `results` and write the workbook and csv tables into `dir`
pub fn write_report(results: &[(String, f64)], dir: &Path) -> Result<Report> {
    let mut report = Report::from_results(results);
    let removed = report.drop_zero_columns(ZERO_EPS);
    info!(removed, period = ?report.period, "prepared report");

    report.write_xlsx(&dir.join(format!("{REPORT_STEM}.xlsx")))?;
    report.write_csv(dir, REPORT_STEM)?;
    Ok(report)
}

/// Write the model as an LP file with generic names plus the name map
pub fn export_lp(assembled: &AssembledModel, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let lp_path = dir.join(LP_FILE);
    let mut file =
        File::create(&lp_path).with_context(|| format!("creating {}", lp_path.display()))?;
    write_lp(&assembled.model, &mut file)
        .with_context(|| format!("writing {}", lp_path.display()))?;

    let names_path = dir.join(NAMES_FILE);
    let file =
        File::create(&names_path).with_context(|| format!("creating {}", names_path.display()))?;
    NameMap::from_model(&assembled.model)
        .write_csv(file)
        .with_context(|| format!("writing {}", names_path.display()))?;

    info!(lp = %lp_path.display(), names = %names_path.display(), "exported model");
    Ok(())
}

/// Full batch run of `config`. Returns the solve outcome.
pub fn run(config: &Config, solver: SolverKind, report: bool) -> Result<SolveOutcome> {
    let (topology, assembled) = build_model(config)?;
    let outcome = MilpSolver::new(solver).solve(&assembled.model)?;

    let dir = &config.output.dir;
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    io::save_results(&dir.join(RESULTS_FILE), &outcome.results)?;

    let summary = RunSummary {
        objective: outcome.objective,
        solver,
        components: topology.len(),
        variables: assembled.model.variables().len(),
        constraints: assembled.model.constraints().len(),
        disjunctions: assembled.model.disjunctions().len(),
        finished_at: Utc::now(),
    };
    let summary_path = dir.join(SUMMARY_FILE);
    let file = File::create(&summary_path)
        .with_context(|| format!("creating {}", summary_path.display()))?;
    serde_json::to_writer_pretty(file, &summary).context("writing run summary")?;

    if report {
        write_report(&outcome.results, dir)?;
    }
    info!(objective = outcome.objective, dir = %dir.display(), "run complete");
    Ok(outcome)
}
