use crate::engine::error::EngineError;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::{debug, trace};

const STDERR_TAIL_LINES: usize = 20;

/// An external program plus the leading arguments it is always invoked with,
/// e.g. `conda run -n md pdbfixer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Splits a command given as words; the first word is the program.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Option<Self> {
        let (program, args) = words.split_first()?;
        let program = program.as_ref().trim();
        if program.is_empty() {
            return None;
        }
        Some(Self::new(program).with_args(args.iter().map(|a| a.as_ref().to_string())))
    }

    /// Runs the command with `extra` appended to its arguments and waits for
    /// it to finish.
    ///
    /// # Errors
    ///
    /// [`EngineError::ToolLaunch`] when the program cannot be started,
    /// [`EngineError::ToolFailed`] with the tail of stderr on a non-zero exit.
    pub(crate) fn run<I, S>(&self, extra: I) -> Result<Output, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(extra);
        debug!("Running {:?}", command);

        let output = command.output().map_err(|source| EngineError::ToolLaunch {
            program: self.to_string(),
            source,
        })?;
        trace!(
            "{} stdout:\n{}",
            self,
            String::from_utf8_lossy(&output.stdout)
        );

        if !output.status.success() {
            return Err(EngineError::ToolFailed {
                program: self.to_string(),
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(output)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
