use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Failed to read '{path}': {source}", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write '{path}': {source}", path = path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Input and output refer to the same file: '{path}'", path = path.display())]
    SamePath { path: PathBuf },
}

/// A line-oriented transformation over structure files.
///
/// Implementors only decide which lines survive; the default path-based
/// methods take care of opening, buffering and releasing the files.
pub trait RecordFilter {
    /// Summary produced by one pass.
    type Report;

    /// Streams `reader` into `writer`, dropping the lines this filter rejects.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading or writing.
    fn filter_from(
        &self,
        reader: &mut impl BufRead,
        writer: &mut impl Write,
    ) -> io::Result<Self::Report>;

    /// Filters the file at `input` into a newly created (or truncated) file at
    /// `output`.
    ///
    /// The input is opened before the output is created, so a missing input
    /// never leaves an empty output behind.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::SamePath`] when both paths name the same file,
    /// otherwise a read or write error tagged with the offending path.
    fn filter_path<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<Self::Report, FilterError> {
        let input = input.as_ref();
        let output = output.as_ref();
        ensure_distinct(input, output)?;

        let read_err = |source| FilterError::Read {
            path: input.to_path_buf(),
            source,
        };
        let write_err = |source| FilterError::Write {
            path: output.to_path_buf(),
            source,
        };

        let mut reader = BufReader::new(File::open(input).map_err(read_err)?);
        let mut writer = BufWriter::new(File::create(output).map_err(write_err)?);

        // Attribute the failure to whichever side actually broke.
        let mut tracked = TrackedWriter {
            inner: &mut writer,
            failed: false,
        };
        match self.filter_from(&mut reader, &mut tracked) {
            Ok(report) => Ok(report),
            Err(e) if tracked.failed => Err(write_err(e)),
            Err(e) => Err(read_err(e)),
        }
    }
}

/// Whether `a` and `b` name the same file.
///
/// Paths are compared canonically when both exist, literally otherwise.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn ensure_distinct(input: &Path, output: &Path) -> Result<(), FilterError> {
    if same_file(input, output) {
        return Err(FilterError::SamePath {
            path: input.to_path_buf(),
        });
    }
    Ok(())
}

struct TrackedWriter<'a, W: Write> {
    inner: &'a mut W,
    failed: bool,
}

impl<W: Write> Write for TrackedWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).inspect_err(|e| self.record(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|e| self.record(e))
    }
}

impl<W: Write> TrackedWriter<'_, W> {
    // `write_all` retries interrupted writes.
    fn record(&mut self, error: &io::Error) {
        if error.kind() != io::ErrorKind::Interrupted {
            self.failed = true;
        }
    }
}
