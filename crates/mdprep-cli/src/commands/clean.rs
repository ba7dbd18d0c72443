use crate::cli::CleanArgs;
use crate::config::{load_file_config, resolve_exclusions};
use crate::error::Result;
use mdprep::core::io::hetatm::HetatmFilter;
use mdprep::core::io::traits::RecordFilter;
use mdprep::engine::error::EngineError;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(args: CleanArgs, config_path: Option<&Path>) -> Result<()> {
    let file_config = load_file_config(config_path)?;
    let exclusions = resolve_exclusions(&args.removal, &file_config);
    if exclusions.is_empty() {
        warn!("No residues selected for removal; the output will be a verbatim copy.");
    }

    info!("Removing hetero groups [{}] from {:?}", exclusions, args.input);
    let filter = HetatmFilter::new(exclusions);
    let report = tokio::task::block_in_place(|| filter.filter_path(&args.input, &args.output))
        .map_err(EngineError::from)?;

    info!("{}", report);
    println!("✓ {}", report);
    println!("✓ Cleaned structure written to: {}", args.output.display());
    Ok(())
}
