use crate::core::io::hetatm::ExclusionSet;
use crate::core::models::ids::StructureId;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PH: f64 = 7.4;
pub const DEFAULT_SIMULATION_STEPS: u64 = 1000;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {param}: {reason}")]
    InvalidValue { param: &'static str, reason: String },
}

/// Where the unprocessed structure comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Download(StructureId),
    LocalFile(PathBuf),
}

/// File names of the intermediate and final structures, relative to the
/// work directory.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFiles {
    pub raw: PathBuf,
    pub fixed: PathBuf,
    pub cleaned: PathBuf,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("protein.pdb"),
            fixed: PathBuf::from("protein_fixed.pdb"),
            cleaned: PathBuf::from("protein_cleaned.pdb"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepairConfig {
    pub ph: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub steps: u64,
    pub ligand: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub source: InputSource,
    pub work_dir: PathBuf,
    pub files: OutputFiles,
    /// `None` skips the repair step.
    pub repair: Option<RepairConfig>,
    pub exclusions: ExclusionSet,
    /// `None` skips the simulation step.
    pub simulation: Option<SimulationConfig>,
}

impl PipelineConfig {
    pub fn raw_path(&self) -> PathBuf {
        self.work_dir.join(&self.files.raw)
    }

    pub fn fixed_path(&self) -> PathBuf {
        self.work_dir.join(&self.files.fixed)
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.work_dir.join(&self.files.cleaned)
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    source: Option<InputSource>,
    work_dir: Option<PathBuf>,
    files: Option<OutputFiles>,
    repair_enabled: Option<bool>,
    ph: Option<f64>,
    exclusions: Option<ExclusionSet>,
    simulation_enabled: Option<bool>,
    simulation_steps: Option<u64>,
    ligand: Option<PathBuf>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: InputSource) -> Self {
        self.source = Some(source);
        self
    }
    pub fn work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = Some(dir);
        self
    }
    pub fn files(mut self, files: OutputFiles) -> Self {
        self.files = Some(files);
        self
    }
    pub fn repair(mut self, enabled: bool) -> Self {
        self.repair_enabled = Some(enabled);
        self
    }
    pub fn ph(mut self, ph: f64) -> Self {
        self.ph = Some(ph);
        self
    }
    pub fn exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = Some(exclusions);
        self
    }
    pub fn simulation(mut self, enabled: bool) -> Self {
        self.simulation_enabled = Some(enabled);
        self
    }
    pub fn simulation_steps(mut self, steps: u64) -> Self {
        self.simulation_steps = Some(steps);
        self
    }
    pub fn ligand(mut self, ligand: Option<PathBuf>) -> Self {
        self.ligand = ligand;
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let source = self
            .source
            .ok_or(ConfigError::MissingParameter("source"))?;
        let files = self.files.unwrap_or_default();
        for (param, name) in [
            ("files.raw", &files.raw),
            ("files.fixed", &files.fixed),
            ("files.cleaned", &files.cleaned),
        ] {
            validate_file_name(param, name)?;
        }
        if files.fixed == files.cleaned || files.raw == files.cleaned {
            return Err(ConfigError::InvalidValue {
                param: "files.cleaned",
                reason: "must differ from the raw and repaired file names".to_string(),
            });
        }

        let repair = if self.repair_enabled.unwrap_or(true) {
            let ph = validate_ph(self.ph.unwrap_or(DEFAULT_PH))?;
            Some(RepairConfig { ph })
        } else {
            None
        };

        let simulation = if self.simulation_enabled.unwrap_or(true) {
            let steps =
                validate_steps(self.simulation_steps.unwrap_or(DEFAULT_SIMULATION_STEPS))?;
            Some(SimulationConfig {
                steps,
                ligand: self.ligand,
            })
        } else {
            None
        };

        Ok(PipelineConfig {
            source,
            work_dir: self.work_dir.unwrap_or_else(|| PathBuf::from(".")),
            files,
            repair,
            exclusions: self.exclusions.unwrap_or_default(),
            simulation,
        })
    }
}

pub fn validate_ph(ph: f64) -> Result<f64, ConfigError> {
    if !(0.0..=14.0).contains(&ph) {
        return Err(ConfigError::InvalidValue {
            param: "ph",
            reason: format!("{ph} is outside the range 0-14"),
        });
    }
    Ok(ph)
}

pub fn validate_steps(steps: u64) -> Result<u64, ConfigError> {
    if steps == 0 {
        return Err(ConfigError::InvalidValue {
            param: "simulation.steps",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(steps)
}

fn validate_file_name(param: &'static str, name: &Path) -> Result<(), ConfigError> {
    if name.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            param,
            reason: "file name cannot be empty".to_string(),
        });
    }
    Ok(())
}
