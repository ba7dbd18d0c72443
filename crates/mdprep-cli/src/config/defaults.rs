use mdprep::engine::config::{DEFAULT_PH, DEFAULT_SIMULATION_STEPS, OutputFiles};
use mdprep::engine::tasks::download::{DEFAULT_TIMEOUT, RCSB_DOWNLOAD_URL};
use mdprep::engine::tasks::repair::DEFAULT_PDBFIXER;
use mdprep::engine::tasks::simulate::DEFAULT_PYTHON;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub work_dir: PathBuf,
    pub files: OutputFiles,
    pub download_base_url: String,
    pub download_timeout_secs: u64,
    pub pdbfixer_command: Vec<String>,
    pub repair_enabled: bool,
    pub ph: f64,
    pub python_command: Vec<String>,
    pub simulation_enabled: bool,
    pub simulation_steps: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            files: OutputFiles::default(),
            download_base_url: RCSB_DOWNLOAD_URL.to_string(),
            download_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            pdbfixer_command: vec![DEFAULT_PDBFIXER.to_string()],
            repair_enabled: true,
            ph: DEFAULT_PH,
            python_command: vec![DEFAULT_PYTHON.to_string()],
            simulation_enabled: true,
            simulation_steps: DEFAULT_SIMULATION_STEPS,
        }
    }
}
