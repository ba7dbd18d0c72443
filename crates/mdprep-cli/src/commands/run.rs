use crate::cli::RunArgs;
use crate::config::{AppConfig, build_config, load_file_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdprep::{
    engine::{
        error::EngineError,
        progress::ProgressReporter,
        tasks::{
            download::RcsbDownloader, repair::PdbFixerRepairer, simulate::QuickrunSimulator,
        },
    },
    workflows::prepare::{self, Collaborators, PipelineResult, SimulationOutcome},
};
use std::path::Path;
use tracing::{info, warn};

pub async fn run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let file_config = load_file_config(config_path)?;
    info!("Merging configuration from file and CLI arguments...");
    let AppConfig { pipeline, tools } = build_config(&args, file_config)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Preparing structure in {}...", pipeline.work_dir.display());
    info!("Invoking the core preparation workflow...");

    // The blocking HTTP client must be created and dropped off the async executor.
    let result = tokio::task::block_in_place(|| -> std::result::Result<_, EngineError> {
        let downloader = RcsbDownloader::new(&tools.download_base_url, tools.download_timeout)?;
        let repairer = PdbFixerRepairer::new(tools.pdbfixer);
        let simulator = QuickrunSimulator::new(tools.python);
        let collaborators = Collaborators {
            source: &downloader,
            repairer: &repairer,
            simulator: &simulator,
        };
        prepare::run(&pipeline, &collaborators, &reporter)
    })?;

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &PipelineResult) {
    if let Some(fixed) = &result.fixed {
        println!("✓ Repaired structure written to: {}", fixed.display());
    }
    println!("✓ {}", result.filter);
    println!("✓ Cleaned structure written to: {}", result.cleaned.display());

    match &result.simulation {
        SimulationOutcome::Completed => println!("✓ MD simulation completed."),
        SimulationOutcome::Failed { reason } => {
            warn!("Simulation failed; the cleaned structure is still usable.");
            eprintln!("⚠ MD simulation failed: {}", reason);
        }
        SimulationOutcome::Skipped => println!("  MD simulation skipped."),
    }
}
