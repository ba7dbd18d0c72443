use crate::error::{CliError, Result};
use mdprep::core::io::hetatm::ResiduePreset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub work_dir: Option<PathBuf>,
    pub raw: Option<PathBuf>,
    pub fixed: Option<PathBuf>,
    pub cleaned: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDownloadConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRepairConfig {
    pub enabled: Option<bool>,
    /// Program followed by its leading arguments, e.g. `["conda", "run", "-n", "md", "pdbfixer"]`.
    pub command: Option<Vec<String>>,
    pub ph: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileFilterConfig {
    pub remove_residues: Option<Vec<String>>,
    pub presets: Option<Vec<ResiduePreset>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSimulationConfig {
    pub enabled: Option<bool>,
    pub python: Option<Vec<String>>,
    pub steps: Option<u64>,
    pub ligand: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output: Option<FileOutputConfig>,
    pub download: Option<FileDownloadConfig>,
    pub repair: Option<FileRepairConfig>,
    pub filter: Option<FileFilterConfig>,
    pub simulation: Option<FileSimulationConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
