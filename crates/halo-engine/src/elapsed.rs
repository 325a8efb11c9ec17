//! Append-only sink for the coordinator's elapsed-time measurement.
//!
//! One run produces one line of text, `elapsed time: <seconds>`.

use std::error::Error;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default log file, relative to the working directory.
pub const DEFAULT_ELAPSED_LOG: &str = "speed.txt";

/// Render the line recorded for one run.
pub fn elapsed_line(elapsed: Duration) -> String {
    format!("elapsed time: {}", elapsed.as_secs_f64())
}

/// Errors from recording an elapsed-time line.
#[derive(Debug)]
pub enum SinkError {
    /// The log file could not be opened or written.
    Io {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot append to {}: {source}", path.display())
            }
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Destination for elapsed-time measurements.
pub trait ElapsedSink {
    /// Append one measurement.
    fn record(&mut self, elapsed: Duration) -> Result<(), SinkError>;
}

/// Appends lines to a file, creating it if needed.
#[derive(Clone, Debug)]
pub struct ElapsedLog {
    path: PathBuf,
}

impl ElapsedLog {
    /// Log to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ElapsedLog {
    fn default() -> Self {
        Self::new(DEFAULT_ELAPSED_LOG)
    }
}

impl ElapsedSink for ElapsedLog {
    fn record(&mut self, elapsed: Duration) -> Result<(), SinkError> {
        let io_err = |source| SinkError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{}", elapsed_line(elapsed)).map_err(io_err)
    }
}

impl ElapsedSink for Vec<String> {
    fn record(&mut self, elapsed: Duration) -> Result<(), SinkError> {
        self.push(elapsed_line(elapsed));
        Ok(())
    }
}
