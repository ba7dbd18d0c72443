use crate::cli::RepairArgs;
use crate::config::{build_tools_config, load_file_config};
use crate::error::{CliError, Result};
use mdprep::engine::config::{DEFAULT_PH, validate_ph};
use mdprep::engine::tasks::repair::{PdbFixerRepairer, StructureRepairer};
use std::path::Path;

pub async fn run(args: RepairArgs, config_path: Option<&Path>) -> Result<()> {
    let file_config = load_file_config(config_path)?;
    let tools = build_tools_config(&file_config)?;
    let ph = args
        .ph
        .or(file_config.repair.as_ref().and_then(|r| r.ph))
        .unwrap_or(DEFAULT_PH);
    let ph = validate_ph(ph).map_err(|e| CliError::Argument(e.to_string()))?;

    let repairer = PdbFixerRepairer::new(tools.pdbfixer);
    println!("Repairing {} at pH {}...", args.input.display(), ph);
    let fixed =
        tokio::task::block_in_place(|| repairer.repair(&args.input, &args.output, ph))?;

    println!("✓ Repaired structure written to: {}", fixed.display());
    Ok(())
}
