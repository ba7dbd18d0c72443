use crate::cli::FetchArgs;
use crate::config::{build_tools_config, load_file_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdprep::engine::error::EngineError;
use mdprep::engine::progress::ProgressReporter;
use mdprep::engine::tasks::download::{RcsbDownloader, StructureSource};
use std::path::{Path, PathBuf};
use tracing::info;

pub async fn run(args: FetchArgs, config_path: Option<&Path>) -> Result<()> {
    let tools = build_tools_config(&load_file_config(config_path)?)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.pdb", args.pdb_id)));

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Fetching {} into {:?}", args.pdb_id, output);
    let path = tokio::task::block_in_place(|| -> std::result::Result<_, EngineError> {
        let downloader = RcsbDownloader::new(&tools.download_base_url, tools.download_timeout)?;
        reporter.phase("Download", || {
            downloader.fetch(&args.pdb_id, &output, &reporter)
        })
    })?;

    println!("✓ Structure {} written to: {}", args.pdb_id, path.display());
    Ok(())
}
