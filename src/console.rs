use crate::error::LogError;
use crate::format::{JsonFormatter, LineFormatter};
use crate::record::LogRecord;
use crate::sink::LogSink;
use std::io::Write;

/// Which standard stream a [`ConsoleSink`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Console implementation of [`LogSink`] writing one formatted line per
/// record to stdout or stderr.
///
/// The stream handle is locked per write, so lines from concurrent
/// emitters never interleave mid-line.
pub struct ConsoleSink {
    target: ConsoleTarget,
    formatter: Box<dyn LineFormatter>,
}

impl ConsoleSink {
    /// Construct a sink for the given stream with an explicit formatter.
    pub fn new(target: ConsoleTarget, formatter: impl LineFormatter + 'static) -> Self {
        ConsoleSink { target, formatter: Box::new(formatter) }
    }

    /// JSON-formatted sink on stdout.
    pub fn stdout() -> Self {
        ConsoleSink::new(ConsoleTarget::Stdout, JsonFormatter)
    }

    /// JSON-formatted sink on stderr.
    pub fn stderr() -> Self {
        ConsoleSink::new(ConsoleTarget::Stderr, JsonFormatter)
    }
}

impl LogSink for ConsoleSink {
    fn send(&self, record: &LogRecord) -> Result<(), LogError> {
        let line = self.formatter.format_line(record)?;
        match self.target {
            ConsoleTarget::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{}", line)?;
            }
            ConsoleTarget::Stderr => {
                let stderr = std::io::stderr();
                let mut handle = stderr.lock();
                writeln!(handle, "{}", line)?;
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), LogError> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().lock().flush()?,
        }
        Ok(())
    }
}
