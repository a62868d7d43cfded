//! Per-node log sinks.
//!
//! Each node appends three line-oriented files under the log directory:
//! every message received, every message sent, and every DATA payload
//! delivered at its final destination. Sinks are injected writers, so
//! the node task can run against in-memory buffers in tests.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use olsrsim_core::NodeId;

/// The three per-node log streams.
pub struct NodeSinks {
    input: Box<dyn Write + Send>,
    output: Box<dyn Write + Send>,
    received: Box<dyn Write + Send>,
}

impl NodeSinks {
    /// Create the standard on-disk sinks `<dir>/<id>_in.txt`,
    /// `<dir>/<id>_out.txt` and `<dir>/<id>_received.txt`, creating the
    /// directory first if needed. Existing files are truncated.
    pub fn create_in(dir: &Path, id: NodeId) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            input: Box::new(File::create(dir.join(format!("{id}_in.txt")))?),
            output: Box::new(File::create(dir.join(format!("{id}_out.txt")))?),
            received: Box::new(File::create(dir.join(format!("{id}_received.txt")))?),
        })
    }

    /// Build sinks from arbitrary writers.
    pub fn from_writers(
        input: impl Write + Send + 'static,
        output: impl Write + Send + 'static,
        received: impl Write + Send + 'static,
    ) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            received: Box::new(received),
        }
    }

    /// Append one received-message line.
    pub fn log_input(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.input, "{line}")
    }

    /// Append one sent-message line.
    pub fn log_output(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Append one delivered-payload line.
    pub fn log_received(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.received, "{line}")
    }

    /// Flush all three streams.
    pub fn flush(&mut self) -> io::Result<()> {
        self.input.flush()?;
        self.output.flush()?;
        self.received.flush()
    }
}
