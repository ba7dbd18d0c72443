use crate::core::io::hetatm::{FilterReport, HetatmFilter};
use crate::core::io::traits::{RecordFilter, same_file};
use crate::engine::config::{InputSource, PipelineConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::download::StructureSource;
use crate::engine::tasks::repair::StructureRepairer;
use crate::engine::tasks::simulate::{SimulationRequest, SimulationRunner};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// The outside programs and services the pipeline delegates to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub source: &'a dyn StructureSource,
    pub repairer: &'a dyn StructureRepairer,
    pub simulator: &'a dyn SimulationRunner,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    Completed,
    Failed { reason: String },
    Skipped,
}

impl fmt::Display for SimulationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The unprocessed structure, downloaded or supplied locally.
    pub raw: PathBuf,
    /// `None` when the repair step was skipped.
    pub fixed: Option<PathBuf>,
    pub cleaned: PathBuf,
    pub filter: FilterReport,
    pub simulation: SimulationOutcome,
}

/// Runs acquire, repair, filter and simulate in order.
///
/// Any failure before the simulation step aborts the run. A simulation
/// failure is logged and recorded in [`PipelineResult::simulation`].
#[instrument(skip_all, name = "prepare_workflow")]
pub fn run(
    config: &PipelineConfig,
    collaborators: &Collaborators,
    reporter: &ProgressReporter,
) -> Result<PipelineResult, EngineError> {
    std::fs::create_dir_all(&config.work_dir).map_err(|source| EngineError::Io {
        path: config.work_dir.clone(),
        source,
    })?;

    // === Phase 1: Acquire ===
    let raw = reporter.phase("Acquire", || {
        acquire(config, collaborators.source, reporter)
    })?;

    // === Phase 2: Repair (optional) ===
    let fixed = match &config.repair {
        Some(repair) => Some(reporter.phase("Repair", || {
            collaborators
                .repairer
                .repair(&raw, &config.fixed_path(), repair.ph)
        })?),
        None => {
            info!("Repair step disabled; filtering the unrepaired structure.");
            None
        }
    };

    // === Phase 3: Filter hetero groups ===
    let cleaned = config.cleaned_path();
    let input = fixed.as_deref().unwrap_or(raw.as_path());
    let filter = reporter.phase("Filter", || {
        let report = strip_hetero_groups(input, &cleaned, config)?;
        reporter.report(Progress::Message(report.to_string()));
        Ok::<_, EngineError>(report)
    })?;

    // === Phase 4: Simulate (optional, non-fatal) ===
    let simulation = match &config.simulation {
        Some(simulation) => {
            let request = SimulationRequest {
                protein: cleaned.clone(),
                ligand: simulation.ligand.clone(),
                steps: simulation.steps,
            };
            reporter.phase("Simulate", || simulate(collaborators.simulator, &request))
        }
        None => SimulationOutcome::Skipped,
    };

    info!("Workflow complete. Cleaned structure at {:?}.", cleaned);
    Ok(PipelineResult {
        raw,
        fixed,
        cleaned,
        filter,
        simulation,
    })
}

fn acquire(
    config: &PipelineConfig,
    source: &dyn StructureSource,
    reporter: &ProgressReporter,
) -> Result<PathBuf, EngineError> {
    match &config.source {
        InputSource::Download(id) => source.fetch(id, &config.raw_path(), reporter),
        InputSource::LocalFile(path) => {
            if !path.is_file() {
                return Err(EngineError::Io {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "input structure does not exist",
                    ),
                });
            }
            let outputs = config
                .repair
                .as_ref()
                .map(|_| config.fixed_path())
                .into_iter()
                .chain([config.cleaned_path()]);
            for output in outputs {
                if same_file(path, &output) {
                    return Err(EngineError::InputOverwrite { path: path.clone() });
                }
            }
            info!("Using local structure {:?}", path);
            Ok(path.clone())
        }
    }
}

fn simulate(simulator: &dyn SimulationRunner, request: &SimulationRequest) -> SimulationOutcome {
    match simulator.run(request) {
        Ok(()) => {
            info!("MD simulation completed.");
            SimulationOutcome::Completed
        }
        Err(e) => {
            warn!("MD simulation failed: {}", e);
            SimulationOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn strip_hetero_groups(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<FilterReport, EngineError> {
    info!(
        "Removing hetero groups [{}] from {:?}",
        config.exclusions, input
    );
    let filter = HetatmFilter::new(config.exclusions.clone());
    let report = filter.filter_path(input, output)?;
    info!("{}", report);
    info!("Cleaned structure saved as {:?}", output);
    Ok(report)
}
