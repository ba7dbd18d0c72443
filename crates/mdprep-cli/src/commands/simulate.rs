use crate::cli::SimulateArgs;
use crate::config::{build_tools_config, load_file_config};
use crate::error::{CliError, Result};
use mdprep::engine::config::{DEFAULT_SIMULATION_STEPS, validate_steps};
use mdprep::engine::tasks::simulate::{QuickrunSimulator, SimulationRequest, SimulationRunner};
use std::path::Path;

/// Unlike the `run` pipeline, a failed simulation here is the command's
/// failure.
pub async fn run(args: SimulateArgs, config_path: Option<&Path>) -> Result<()> {
    let file_config = load_file_config(config_path)?;
    let tools = build_tools_config(&file_config)?;
    let sim_file = file_config.simulation.clone().unwrap_or_default();

    let steps = args
        .steps
        .or(sim_file.steps)
        .unwrap_or(DEFAULT_SIMULATION_STEPS);
    let request = SimulationRequest {
        protein: args.input,
        ligand: args.ligand.or(sim_file.ligand),
        steps: validate_steps(steps).map_err(|e| CliError::Argument(e.to_string()))?,
    };

    let simulator = QuickrunSimulator::new(tools.python);
    println!(
        "Running {} MD steps on {}...",
        request.steps,
        request.protein.display()
    );
    tokio::task::block_in_place(|| simulator.run(&request))?;

    println!("✓ MD simulation completed.");
    Ok(())
}
