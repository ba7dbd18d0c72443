use super::command::ToolCommand;
use crate::engine::error::EngineError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_PYTHON: &str = "python3";

/// Inline driver for easy-md. Inputs arrive through `sys.argv` only.
const QUICKRUN_DRIVER: &str = "\
import sys
from easy_md.main.quickrun import quickrun
quickrun(protein_file=sys.argv[1], ligand_file=sys.argv[2] or None, nsteps=int(sys.argv[3]))
";

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub protein: PathBuf,
    pub ligand: Option<PathBuf>,
    pub steps: u64,
}

/// Runs a short molecular-dynamics simulation on a prepared structure.
pub trait SimulationRunner {
    fn run(&self, request: &SimulationRequest) -> Result<(), EngineError>;
}

/// Runs easy-md's `quickrun` through a Python interpreter.
pub struct QuickrunSimulator {
    python: ToolCommand,
}

impl QuickrunSimulator {
    pub fn new(python: ToolCommand) -> Self {
        Self { python }
    }

    pub fn arguments(request: &SimulationRequest) -> Vec<OsString> {
        vec![
            OsString::from("-c"),
            OsString::from(QUICKRUN_DRIVER),
            request.protein.as_os_str().to_os_string(),
            request
                .ligand
                .as_deref()
                .map(|p| p.as_os_str().to_os_string())
                .unwrap_or_default(),
            OsString::from(request.steps.to_string()),
        ]
    }
}

impl Default for QuickrunSimulator {
    fn default() -> Self {
        Self::new(ToolCommand::new(DEFAULT_PYTHON))
    }
}

impl SimulationRunner for QuickrunSimulator {
    fn run(&self, request: &SimulationRequest) -> Result<(), EngineError> {
        for path in std::iter::once(request.protein.as_path()).chain(request.ligand.as_deref()) {
            ensure_exists(path)?;
        }
        info!(
            "Running MD on {:?} for {} steps (ligand: {:?})",
            request.protein, request.steps, request.ligand
        );
        self.python.run(Self::arguments(request))?;
        Ok(())
    }
}

fn ensure_exists(path: &Path) -> Result<(), EngineError> {
    if path.is_file() {
        return Ok(());
    }
    Err(EngineError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "structure file does not exist",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn request_in(dir: &Path) -> SimulationRequest {
        let protein = dir.join("protein_cleaned.pdb");
        fs::write(&protein, "END\n").unwrap();
        SimulationRequest {
            protein,
            ligand: None,
            steps: 1000,
        }
    }

    #[test]
    fn arguments_pass_inputs_through_argv() {
        let request = SimulationRequest {
            protein: PathBuf::from("protein_cleaned.pdb"),
            ligand: Some(PathBuf::from("ligand.sdf")),
            steps: 250,
        };
        let args = QuickrunSimulator::arguments(&request);

        assert_eq!(args[0], "-c");
        assert!(args[1].to_string_lossy().contains("quickrun("));
        assert_eq!(args[2], "protein_cleaned.pdb");
        assert_eq!(args[3], "ligand.sdf");
        assert_eq!(args[4], "250");
    }

    #[test]
    fn missing_ligand_is_passed_as_empty_argument() {
        let request = SimulationRequest {
            protein: PathBuf::from("p.pdb"),
            ligand: None,
            steps: 10,
        };
        assert_eq!(QuickrunSimulator::arguments(&request)[3], "");
    }

    #[test]
    fn missing_structure_fails_before_launching() {
        let dir = tempdir().unwrap();
        let mut request = request_in(dir.path());
        request.ligand = Some(dir.path().join("ligand.sdf"));

        let result =
            QuickrunSimulator::new(ToolCommand::new("mdprep-no-such-python")).run(&request);

        match result {
            Err(EngineError::Io { path, .. }) => assert_eq!(path, dir.path().join("ligand.sdf")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn missing_interpreter_is_a_launch_error() {
        let dir = tempdir().unwrap();
        let request = request_in(dir.path());

        let result =
            QuickrunSimulator::new(ToolCommand::new("mdprep-no-such-python")).run(&request);

        assert!(matches!(result, Err(EngineError::ToolLaunch { .. })));
    }

    /// A shell script standing in for the interpreter. It sees the same
    /// argv as Python would: `-c DRIVER protein ligand steps`.
    #[cfg(unix)]
    fn fake_python(dir: &Path, script: &str) -> ToolCommand {
        let path = dir.join("fake-python.sh");
        fs::write(&path, format!("{script}\n")).unwrap();
        ToolCommand::new("sh").with_args([path])
    }

    #[cfg(unix)]
    #[test]
    fn interpreter_receives_driver_and_request() {
        let dir = tempdir().unwrap();
        let request = request_in(dir.path());
        let python = fake_python(
            dir.path(),
            r#"test "$1" = "-c" && test -f "$3" && test -z "$4" && test "$5" = 1000"#,
        );

        assert!(QuickrunSimulator::new(python).run(&request).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn interpreter_failure_is_reported() {
        let dir = tempdir().unwrap();
        let request = request_in(dir.path());
        let python = fake_python(
            dir.path(),
            "echo 'ModuleNotFoundError: easy_md' >&2; exit 1",
        );

        match QuickrunSimulator::new(python).run(&request) {
            Err(EngineError::ToolFailed { stderr, .. }) => {
                assert_eq!(stderr, "ModuleNotFoundError: easy_md")
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }
}
