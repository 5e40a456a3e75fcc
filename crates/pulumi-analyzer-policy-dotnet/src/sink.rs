//! Destination for build tool output and log records.
//!
//! The analyzer host reserves the plugin's stdout for protocol responses, so
//! build output and telemetry go to a log file instead. The sink is opened
//! once at startup and handed to the components that write to it; the
//! process's own standard streams are never reassigned.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Where child processes and telemetry write their output.
#[derive(Debug, Clone, Default)]
pub enum OutputSink {
    /// Share the plugin's own standard streams.
    #[default]
    Inherit,
    /// Append to an open log file.
    File(Arc<File>),
}

impl OutputSink {
    /// Opens `path` for appending, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening the file.
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        options.open(path).map(|file| Self::File(Arc::new(file)))
    }

    /// Opens `path`, falling back to [`OutputSink::Inherit`] on failure.
    ///
    /// The failure is reported on `fallback` so that startup can continue.
    pub fn open_or_inherit(path: &Path, fallback: &mut impl Write) -> Self {
        match Self::open(path) {
            Ok(sink) => sink,
            Err(error) => {
                writeln!(fallback, "Error opening log file {}: {error}", path.display()).ok();
                Self::Inherit
            }
        }
    }

    /// Returns whether output goes to a log file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Creates a child stdio handle writing to this sink.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while duplicating the file handle.
    pub fn stdio(&self) -> io::Result<Stdio> {
        match self {
            Self::Inherit => Ok(Stdio::inherit()),
            Self::File(file) => file.try_clone().map(Stdio::from),
        }
    }

    /// Creates a `tracing` writer for this sink.
    ///
    /// [`OutputSink::Inherit`] logs to stderr.
    #[must_use]
    pub fn make_writer(&self) -> BoxMakeWriter {
        match self {
            Self::Inherit => BoxMakeWriter::new(io::stderr),
            Self::File(file) => BoxMakeWriter::new(Arc::clone(file)),
        }
    }
}
