use super::command::ToolCommand;
use crate::core::io::traits::same_file;
use crate::engine::error::EngineError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_PDBFIXER: &str = "pdbfixer";

/// Completes missing residues and atoms and protonates a structure.
pub trait StructureRepairer {
    /// Writes a repaired copy of `input` to `output`, adding hydrogens for
    /// the given `ph`, and returns the written path.
    fn repair(&self, input: &Path, output: &Path, ph: f64) -> Result<PathBuf, EngineError>;
}

/// Repairs structures with the PDBFixer command-line program.
///
/// Hetero groups are kept so that a later filtering step decides what to
/// strip.
pub struct PdbFixerRepairer {
    command: ToolCommand,
}

impl PdbFixerRepairer {
    pub fn new(command: ToolCommand) -> Self {
        Self { command }
    }

    pub fn arguments(input: &Path, output: &Path, ph: f64) -> Vec<OsString> {
        let mut output_arg = OsString::from("--output=");
        output_arg.push(output);
        vec![
            input.as_os_str().to_os_string(),
            output_arg,
            OsString::from("--add-atoms=all"),
            OsString::from("--add-residues"),
            OsString::from("--keep-heterogens=all"),
            OsString::from(format!("--ph={ph}")),
        ]
    }
}

impl Default for PdbFixerRepairer {
    fn default() -> Self {
        Self::new(ToolCommand::new(DEFAULT_PDBFIXER))
    }
}

impl StructureRepairer for PdbFixerRepairer {
    fn repair(&self, input: &Path, output: &Path, ph: f64) -> Result<PathBuf, EngineError> {
        info!("Fixing {:?} with '{}' at pH {}", input, self.command, ph);
        if !input.is_file() {
            return Err(EngineError::Io {
                path: input.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "input structure does not exist",
                ),
            });
        }
        if same_file(input, output) {
            return Err(EngineError::InputOverwrite {
                path: input.to_path_buf(),
            });
        }
        // A stale file from an earlier run must not pass for fresh output.
        if output.exists() {
            std::fs::remove_file(output).map_err(|source| EngineError::Io {
                path: output.to_path_buf(),
                source,
            })?;
        }

        self.command.run(Self::arguments(input, output, ph))?;

        if !output.is_file() {
            return Err(EngineError::MissingOutput {
                path: output.to_path_buf(),
            });
        }
        info!("Fixed structure saved as {:?}", output);
        Ok(output.to_path_buf())
    }
}
