use clap::{Args, Parser, Subcommand};
use mdprep::core::io::hetatm::ResiduePreset;
use mdprep::core::models::ids::StructureId;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "mdprep - Download, repair and clean PDB structures, then smoke-test them with a short MD run.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    /// Defaults to the per-user config file when it exists.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline: acquire, repair, remove hetero groups, simulate.
    Run(RunArgs),
    /// Download a structure from the RCSB Protein Data Bank.
    Fetch(FetchArgs),
    /// Repair a structure with PDBFixer.
    Repair(RepairArgs),
    /// Remove HETATM records of the given residues from a structure.
    Clean(CleanArgs),
    /// Run a short MD simulation on a prepared structure.
    Simulate(SimulateArgs),
}

/// Exactly one input must be given.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// PDB identifier to download (e.g., 6LKD).
    #[arg(long, value_name = "ID")]
    pub pdb_id: Option<StructureId>,

    /// Use a local PDB file instead of downloading one.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

/// Residue selection shared by `run` and `clean`.
#[derive(Args, Debug, Clone, Default)]
pub struct RemovalArgs {
    /// Residue names whose HETATM records are removed.
    /// Comma separated; can be used multiple times. Example: -r FAD,SO4
    #[arg(short, long = "remove", value_name = "NAMES", value_delimiter = ',')]
    pub remove: Vec<String>,

    /// Also remove a predefined group of residues: water, ions or additives.
    #[arg(long, value_name = "NAME")]
    pub preset: Vec<ResiduePreset>,
}

impl RemovalArgs {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.preset.is_empty()
    }
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory receiving the downloaded, repaired and cleaned structures.
    #[arg(short, long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    #[command(flatten)]
    pub removal: RemovalArgs,

    /// Override the pH used when adding hydrogens.
    #[arg(long, value_name = "FLOAT")]
    pub ph: Option<f64>,

    /// Override the number of MD steps.
    #[arg(short = 'n', long, value_name = "INT")]
    pub steps: Option<u64>,

    /// Ligand file passed to the simulation.
    #[arg(long, value_name = "PATH")]
    pub ligand: Option<PathBuf>,

    /// Skip the PDBFixer repair step.
    #[arg(long)]
    pub no_repair: bool,

    /// Skip the MD simulation step.
    #[arg(long)]
    pub no_simulate: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S repair.ph=7.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// PDB identifier to download.
    #[arg(required = true, value_name = "ID")]
    pub pdb_id: StructureId,

    /// Destination file. Defaults to `<ID>.pdb` in the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `repair` subcommand.
#[derive(Args, Debug)]
pub struct RepairArgs {
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Override the pH used when adding hydrogens.
    #[arg(long, value_name = "FLOAT")]
    pub ph: Option<f64>,
}

/// Arguments for the `clean` subcommand.
#[derive(Args, Debug)]
pub struct CleanArgs {
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub removal: RemovalArgs,
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Prepared protein structure.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[arg(long, value_name = "PATH")]
    pub ligand: Option<PathBuf>,

    /// Override the number of MD steps.
    #[arg(short = 'n', long, value_name = "INT")]
    pub steps: Option<u64>,
}
